use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::definition::FormState;

/// Unique identifier of a node within a workflow.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(derive_more::Debug, derive_more::Display, derive_more::From, derive_more::Into)]
#[debug("{_0}")]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Category of generation a node performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NodeKind {
    /// Text generation via a chat-completion model.
    Text,
    /// Image generation.
    Image,
    /// Video generation.
    Video,
    /// Audio generation.
    Audio,
    /// Unrecognized node type, carried through without special handling.
    #[serde(other)]
    Other,
}

impl NodeKind {
    /// Returns `true` for kinds whose output is plain text.
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text)
    }
}

/// A single node in a workflow definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Editor-assigned unique identifier.
    pub id: NodeId,
    /// Generation category, drives input assembly and output extraction.
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Form values entered in the editor.
    #[serde(default)]
    pub data: FormState,
    /// Last produced output, if any. Ignored by the engine as an input; the
    /// state store is authoritative during a run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
}

impl Node {
    /// Creates a node with the given identifier and kind.
    pub fn new(id: impl Into<NodeId>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            data: FormState::default(),
            output: None,
        }
    }
}
