//! Node invocation: turning a node plus its upstream outputs into a result.

mod extract;
mod generation;
mod inputs;

use async_trait::async_trait;
use noder_replicate::ProgressFn;
use serde_json::Value;

use crate::WorkflowResult;
use crate::definition::Node;

pub use extract::extract_result;
pub use generation::GenerationInvoker;
pub use inputs::UpstreamInputs;

/// Executes a single node's generation.
///
/// The engine drives scheduling and state; implementations own provider
/// selection, request assembly, and waiting for the result. The returned
/// value is already extracted for the node's kind: joined text for text
/// nodes, a single asset URL for media nodes.
#[async_trait]
pub trait NodeInvoker: Send + Sync {
    /// Runs one node to completion and returns its extracted output.
    async fn invoke(
        &self,
        node: &Node,
        inputs: &UpstreamInputs,
        on_progress: Option<&ProgressFn<'_>>,
    ) -> WorkflowResult<Value>;
}
