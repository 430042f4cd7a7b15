use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use jiff::Timestamp;
use noder_replicate::PollProgress;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::definition::{NodeId, Workflow};
use crate::engine::{RunObserver, RunOptions, RunProgress, RunSummary};
use crate::graph::WorkflowGraph;
use crate::invoker::{NodeInvoker, UpstreamInputs};
use crate::state::{ExecutionState, ResumePlan};
use crate::{TRACING_TARGET, WorkflowError, WorkflowResult};

/// Workflow execution engine.
///
/// Owns the execution state across runs and enforces one run at a time.
/// Nodes execute sequentially: a node becomes eligible once every upstream
/// source has a recorded output, which yields a topological walk without an
/// explicit sort. The state store is written exactly once per run, at the
/// end, whether the run succeeded or not.
pub struct Engine {
    /// Performs the per-node provider work.
    invoker: Arc<dyn NodeInvoker>,
    /// Outputs and failures carried between runs.
    state: Mutex<ExecutionState>,
    /// Single-flight guard.
    running: AtomicBool,
}

/// Clears the running flag when a run exits by any path.
struct RunGuard<'a>(&'a AtomicBool);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Engine {
    /// Creates an engine around a node invoker.
    pub fn new(invoker: Arc<dyn NodeInvoker>) -> Self {
        Self {
            invoker,
            state: Mutex::new(ExecutionState::default()),
            running: AtomicBool::new(false),
        }
    }

    /// Returns `true` while a run is in progress.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Returns a snapshot of the stored execution state.
    pub async fn state(&self) -> ExecutionState {
        self.state.lock().await.clone()
    }

    /// Executes a workflow.
    ///
    /// Returns an error only for conditions that prevent the run from
    /// starting: another run in flight, or a cyclic graph. Node failures are
    /// reported through the returned [`RunSummary`] and the observer, and
    /// leave the state store populated for a later resume.
    pub async fn run(
        &self,
        workflow: &Workflow,
        options: &RunOptions,
        observer: Option<&dyn RunObserver>,
    ) -> WorkflowResult<RunSummary> {
        self.running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| WorkflowError::AlreadyRunning)?;
        let _guard = RunGuard(&self.running);

        let started_at = Timestamp::now();
        let start = Instant::now();

        let scope = workflow.scope(options.target_node_ids.as_deref());
        let graph = WorkflowGraph::compile(&scope)?;

        let skipped: HashSet<&NodeId> = options.skip_node_ids.iter().collect();
        let mut outputs = self.prepare_outputs(&scope, options).await;
        let mut failed: HashSet<NodeId> = HashSet::new();

        let mut pending: Vec<NodeId> = scope
            .nodes
            .iter()
            .filter(|node| !outputs.contains_key(&node.id) && !skipped.contains(&node.id))
            .map(|node| node.id.clone())
            .collect();
        let total = pending.len();
        let mut completed = 0usize;
        let mut run_error: Option<String> = None;

        tracing::info!(
            target: TRACING_TARGET,
            scope_nodes = scope.nodes.len(),
            to_execute = total,
            resume = options.resume,
            "Starting workflow run"
        );

        while !pending.is_empty() {
            // Eligible once every upstream source has an output, preserving
            // the caller's node order among ties.
            let Some(position) = pending.iter().position(|id| {
                graph
                    .upstream_sources(id)
                    .all(|source| outputs.contains_key(source))
            }) else {
                if failed.is_empty() && skipped.iter().all(|id| outputs.contains_key(*id)) {
                    run_error =
                        Some("workflow stalled with no eligible nodes remaining".to_owned());
                } else {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        blocked = pending.len(),
                        "Remaining nodes are blocked behind failed or skipped nodes"
                    );
                }
                break;
            };
            let id = pending.remove(position);
            let Some(node) = scope.node(&id) else {
                run_error = Some(format!("node {id} missing from scope"));
                break;
            };

            if let Some(observer) = observer {
                observer.on_node_start(node);
            }
            let node_start = Instant::now();
            let inputs = gather_inputs(&scope, &id, &outputs);
            let forward_progress = |progress: PollProgress| {
                if let Some(observer) = observer {
                    observer.on_node_progress(node, progress);
                }
            };

            let result = self
                .invoker
                .invoke(node, &inputs, Some(&forward_progress))
                .await;
            completed += 1;

            match result {
                Ok(output) => {
                    tracing::debug!(
                        target: TRACING_TARGET,
                        node_id = %id,
                        elapsed = ?node_start.elapsed(),
                        "Node completed"
                    );
                    if let Some(observer) = observer {
                        observer.on_node_complete(node, &output, node_start.elapsed());
                    }
                    outputs.insert(id, output);
                }
                Err(error) => {
                    let error = WorkflowError::NodeFailed {
                        node_id: id.clone(),
                        message: error.to_string(),
                    };
                    tracing::warn!(
                        target: TRACING_TARGET,
                        node_id = %id,
                        %error,
                        "Node failed"
                    );
                    if let Some(observer) = observer {
                        observer.on_node_error(node, &error);
                    }
                    failed.insert(id);
                    if !options.tolerates_failures() {
                        run_error = Some(error.to_string());
                        if let Some(observer) = observer {
                            observer.on_progress(RunProgress { completed, total });
                        }
                        break;
                    }
                    run_error.get_or_insert_with(|| error.to_string());
                }
            }

            if let Some(observer) = observer {
                observer.on_progress(RunProgress { completed, total });
            }
        }

        let success = failed.is_empty() && run_error.is_none();
        self.finalize(&scope, workflow, success, &outputs, &failed)
            .await;

        tracing::info!(
            target: TRACING_TARGET,
            success,
            completed,
            total,
            failed = failed.len(),
            elapsed = ?start.elapsed(),
            "Workflow run finished"
        );

        Ok(RunSummary {
            success,
            started_at,
            elapsed: start.elapsed(),
            completed_count: completed,
            total_count: total,
            node_outputs: outputs,
            failed_node_ids: failed,
            error: run_error,
        })
    }

    /// Seeds the output cache from prior state per the run options.
    async fn prepare_outputs(
        &self,
        scope: &Workflow,
        options: &RunOptions,
    ) -> HashMap<NodeId, Value> {
        let mut state = self.state.lock().await;

        let mut outputs = if options.resume {
            ResumePlan::build(&state, scope, &options.retry_node_ids, options.retry_failed)
                .initial_outputs
        } else {
            HashMap::new()
        };

        // Skipped nodes keep their last-known output even on a fresh run.
        for id in &options.skip_node_ids {
            if let Some(output) = state.node_outputs.get(id) {
                outputs.entry(id.clone()).or_insert_with(|| output.clone());
            }
        }

        if !options.resume {
            state.reset();
        }
        outputs
    }

    /// Writes the state store at the end of a run.
    ///
    /// A fully successful run over the whole workflow clears the store; any
    /// other outcome persists outputs and failures for a later resume.
    async fn finalize(
        &self,
        scope: &Workflow,
        workflow: &Workflow,
        success: bool,
        outputs: &HashMap<NodeId, Value>,
        failed: &HashSet<NodeId>,
    ) {
        let mut state = self.state.lock().await;
        if success && scope.nodes.len() == workflow.nodes.len() {
            state.reset();
        } else {
            state.persist(
                outputs.clone(),
                scope.nodes.iter().map(|node| node.id.clone()).collect(),
                failed.clone(),
            );
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("running", &self.is_running())
            .finish()
    }
}

/// Collects a node's upstream outputs in the workflow's edge order.
fn gather_inputs(
    scope: &Workflow,
    target: &NodeId,
    outputs: &HashMap<NodeId, Value>,
) -> UpstreamInputs {
    let upstream = scope
        .edges
        .iter()
        .filter(|edge| &edge.target == target)
        .filter_map(|edge| {
            let source = scope.node(&edge.source)?;
            let output = outputs.get(&source.id)?;
            Some((source.kind, output))
        });
    UpstreamInputs::collect(upstream)
}
