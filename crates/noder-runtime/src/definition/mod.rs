//! Workflow definition types as serialized by the editor.

mod edge;
mod form;
mod node;
mod workflow;

pub use edge::Edge;
pub use form::FormState;
pub use node::{Node, NodeId, NodeKind};
pub use workflow::Workflow;
