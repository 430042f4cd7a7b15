//! In-memory execution state carried between runs.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::definition::{NodeId, Workflow};
use crate::graph::downstream_closure;

/// Outputs and failure bookkeeping left behind by the previous run.
///
/// A fully successful run clears the state; a partial run persists it so a
/// follow-up resume can pick up where it stopped.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ExecutionState {
    /// Raw provider outputs keyed by node.
    pub node_outputs: HashMap<NodeId, Value>,
    /// Nodes that were part of the previous run's scope.
    pub scope_node_ids: HashSet<NodeId>,
    /// Nodes whose invocation failed in the previous run.
    pub failed_node_ids: HashSet<NodeId>,
}

impl ExecutionState {
    /// Discards all recorded outputs and failures.
    pub fn reset(&mut self) {
        self.node_outputs.clear();
        self.scope_node_ids.clear();
        self.failed_node_ids.clear();
    }

    /// Replaces the state with the outcome of a run.
    pub fn persist(
        &mut self,
        node_outputs: HashMap<NodeId, Value>,
        scope_node_ids: HashSet<NodeId>,
        failed_node_ids: HashSet<NodeId>,
    ) {
        self.node_outputs = node_outputs;
        self.scope_node_ids = scope_node_ids;
        self.failed_node_ids = failed_node_ids;
    }
}

/// Which prior outputs a resumed run may reuse and which nodes it must redo.
#[derive(Debug, Default)]
pub struct ResumePlan {
    /// Outputs carried over from the previous run.
    pub initial_outputs: HashMap<NodeId, Value>,
}

impl ResumePlan {
    /// Builds a resume plan against the previous run's state.
    ///
    /// Prior outputs for nodes in the current scope are reused, except for
    /// failed nodes, explicitly retried nodes, and everything downstream of a
    /// retried node, whose outputs are stale by definition.
    pub fn build(
        state: &ExecutionState,
        scope: &Workflow,
        retry_node_ids: &[NodeId],
        retry_failed: bool,
    ) -> Self {
        let mut initial_outputs: HashMap<NodeId, Value> = scope
            .nodes
            .iter()
            .filter(|node| !state.failed_node_ids.contains(&node.id))
            .filter_map(|node| {
                state
                    .node_outputs
                    .get(&node.id)
                    .map(|output| (node.id.clone(), output.clone()))
            })
            .collect();

        let mut retry: HashSet<&NodeId> = retry_node_ids.iter().collect();
        if retry_failed {
            retry.extend(state.failed_node_ids.iter());
        }

        if !retry.is_empty() {
            let stale = downstream_closure(retry.into_iter(), &scope.edges);
            initial_outputs.retain(|id, _| !stale.contains(id));
        }

        Self { initial_outputs }
    }
}
