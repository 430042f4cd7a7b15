use std::collections::{HashMap, HashSet};
use std::time::Duration;

use jiff::Timestamp;
use serde_json::Value;

use crate::definition::NodeId;

/// Caller-facing knobs for one engine run.
#[derive(Debug, Default, Clone)]
pub struct RunOptions {
    /// Nodes to produce; `None` runs the whole workflow.
    pub target_node_ids: Option<Vec<NodeId>>,
    /// Reuse outputs from the previous run instead of starting fresh.
    pub resume: bool,
    /// Nodes to force-rerun on resume, along with everything downstream.
    pub retry_node_ids: Vec<NodeId>,
    /// Also force-rerun every node that failed in the previous run.
    pub retry_failed: bool,
    /// Nodes to bypass entirely, reusing their last-known output if any.
    pub skip_node_ids: Vec<NodeId>,
    /// Keep executing unaffected nodes after a failure instead of aborting.
    pub continue_on_error: bool,
    /// Treat failed nodes as skipped and keep walking past them.
    pub skip_failed: bool,
}

impl RunOptions {
    /// Restricts the run to the given targets and their dependencies.
    pub fn with_targets(mut self, target_node_ids: Vec<NodeId>) -> Self {
        self.target_node_ids = Some(target_node_ids);
        self
    }

    /// Enables resuming from the previous run's state.
    pub fn with_resume(mut self, resume: bool) -> Self {
        self.resume = resume;
        self
    }

    /// Forces the given nodes (and their dependents) to rerun on resume.
    pub fn with_retry_nodes(mut self, retry_node_ids: Vec<NodeId>) -> Self {
        self.retry_node_ids = retry_node_ids;
        self
    }

    /// Forces previously failed nodes to rerun on resume.
    pub fn with_retry_failed(mut self, retry_failed: bool) -> Self {
        self.retry_failed = retry_failed;
        self
    }

    /// Bypasses the given nodes, reusing their last-known outputs.
    pub fn with_skip_nodes(mut self, skip_node_ids: Vec<NodeId>) -> Self {
        self.skip_node_ids = skip_node_ids;
        self
    }

    /// Keeps the run going after node failures.
    pub fn with_continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }

    /// Treats failed nodes as skipped instead of aborting.
    pub fn with_skip_failed(mut self, skip_failed: bool) -> Self {
        self.skip_failed = skip_failed;
        self
    }

    /// Returns `true` when a node failure should not abort the walk.
    pub(crate) fn tolerates_failures(&self) -> bool {
        self.continue_on_error || self.skip_failed
    }
}

/// Outcome of one engine run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// `true` when every executed node produced an output.
    pub success: bool,
    /// Wall-clock start of the run.
    pub started_at: Timestamp,
    /// Total run duration.
    pub elapsed: Duration,
    /// Nodes that settled during this run.
    pub completed_count: usize,
    /// Nodes that were scheduled for execution.
    pub total_count: usize,
    /// Raw outputs for every node in scope, preexisting and new.
    pub node_outputs: HashMap<NodeId, Value>,
    /// Nodes whose invocation failed.
    pub failed_node_ids: HashSet<NodeId>,
    /// First failure message, when the run did not fully succeed.
    pub error: Option<String>,
}
