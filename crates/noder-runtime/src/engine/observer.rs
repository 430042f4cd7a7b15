use std::time::Duration;

use noder_replicate::PollProgress;
use serde_json::Value;

use crate::WorkflowError;
use crate::definition::Node;

/// Run-level completion counter reported after each node settles.
#[derive(Debug, Clone, Copy)]
pub struct RunProgress {
    /// Nodes that have settled, successfully or not.
    pub completed: usize,
    /// Nodes scheduled for execution in this run.
    pub total: usize,
}

impl RunProgress {
    /// Completion as a percentage, saturating at 100.
    pub fn percentage(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.completed * 100 / self.total).min(100)) as u8
    }
}

/// Callbacks emitted by the engine while a run executes.
///
/// All methods default to no-ops; implement only what the frontend needs.
/// Callbacks run inline on the executor's task and should return quickly.
pub trait RunObserver: Send + Sync {
    /// A node is about to be invoked.
    fn on_node_start(&self, _node: &Node) {}

    /// A node produced an output.
    fn on_node_complete(&self, _node: &Node, _output: &Value, _elapsed: Duration) {}

    /// A node's invocation failed.
    fn on_node_error(&self, _node: &Node, _error: &WorkflowError) {}

    /// A polled prediction is still pending; emitted on a fixed cadence.
    fn on_node_progress(&self, _node: &Node, _progress: PollProgress) {}

    /// A node settled; reports overall run completion.
    fn on_progress(&self, _progress: RunProgress) {}
}
