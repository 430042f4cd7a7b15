//! Workflow definitions and execution engine for noder pipelines.
//!
//! A workflow is a directed acyclic graph of generation nodes (text, image,
//! video, audio) wired together by data-flow edges. The engine resolves the
//! minimal scope needed to produce a set of target nodes, walks it in
//! dependency order, dispatches each node's work to a chat-completion or
//! create-then-poll provider, and keeps enough state in memory to resume or
//! retry a subset of nodes without redoing completed work.
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use noder_runtime::prelude::*;
//!
//! let invoker = Arc::new(GenerationInvoker::new(credentials)?);
//! let engine = Engine::new(invoker);
//!
//! let summary = engine.run(&workflow, &RunOptions::default(), None).await?;
//! if !summary.success {
//!     // Re-run only what failed, keeping upstream outputs.
//!     let retry = RunOptions::default().with_resume(true).with_retry_failed(true);
//!     engine.run(&workflow, &retry, None).await?;
//! }
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod definition;
pub mod engine;
mod error;
pub mod graph;
pub mod invoker;
pub mod provider;
pub mod state;

#[doc(hidden)]
pub mod prelude;

pub use error::{WorkflowError, WorkflowResult};

/// Tracing target for runtime operations.
pub const TRACING_TARGET: &str = "noder_runtime";
