//! Convenience re-exports for building and running workflows.

pub use crate::definition::{Edge, FormState, Node, NodeId, NodeKind, Workflow};
pub use crate::engine::{Engine, RunObserver, RunOptions, RunProgress, RunSummary};
pub use crate::graph::WorkflowGraph;
pub use crate::invoker::{GenerationInvoker, NodeInvoker, UpstreamInputs, extract_result};
pub use crate::provider::{ChatVendor, CredentialsStore, Provider, ProviderRoute};
pub use crate::state::{ExecutionState, ResumePlan};
pub use crate::{WorkflowError, WorkflowResult};
