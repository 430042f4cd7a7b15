//! Graph compilation and scope resolution over workflow definitions.

mod scope;
mod workflow;

pub use scope::downstream_closure;
pub use workflow::WorkflowGraph;
