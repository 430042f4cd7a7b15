//! Shared HTTP ambient layer for noder provider clients.
//!
//! Provider crates build their reqwest clients through [`HttpConfig`]
//! (timeout, User-Agent, and bearer authentication in one place) and wrap
//! individual calls in [`RetryConfig::retry`]. Errors opt into retry by
//! implementing [`Retryable`]; transport failures and 429/5xx responses are
//! retried, other client errors fail fast.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod config;
mod retry;

pub use crate::config::{ClientError, DEFAULT_TIMEOUT, HttpConfig};
pub use crate::retry::{RetryConfig, Retryable};

/// Tracing target for HTTP/retry operations.
pub const TRACING_TARGET: &str = "noder_reqwest";
