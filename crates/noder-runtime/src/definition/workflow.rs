use serde::{Deserialize, Serialize};

use crate::definition::{Edge, Node, NodeId};

/// Complete workflow definition as serialized by the editor.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Workflow {
    /// All nodes in the canvas.
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// All connections between nodes.
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Workflow {
    /// Creates a workflow from parts.
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    /// Looks up a node by its identifier.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| &node.id == id)
    }

    /// Returns `true` if the workflow has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
