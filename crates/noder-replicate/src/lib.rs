//! Replicate prediction client.
//!
//! Implements the create-then-poll provider protocol: predictions are
//! created against the model-scoped or generic endpoint depending on the
//! model reference form, then polled on a fixed interval until they reach a
//! terminal state or the attempt budget runs out. Budget exhaustion is a
//! dedicated timeout error, distinct from a provider-reported failure.
//!
//! ```ignore
//! use noder_replicate::{PollConfig, ReplicateClient, ReplicateConfig};
//!
//! let client = ReplicateClient::new(ReplicateConfig::new("r8_...")?)?;
//! let prediction = client
//!     .create_prediction("black-forest-labs/flux-schnell", input)
//!     .await?;
//! let finished = client
//!     .poll_prediction(&prediction.id, &PollConfig::default(), None)
//!     .await?;
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod client;
mod config;
mod error;
mod poll;
mod prediction;
mod schema;

pub use crate::client::ReplicateClient;
pub use crate::config::ReplicateConfig;
pub use crate::error::{Error, Result};
pub use crate::poll::{
    DEFAULT_POLL_INTERVAL, DEFAULT_POLL_MAX_ATTEMPTS, PollConfig, PollProgress, ProgressFn,
};
pub use crate::prediction::{ModelRef, Prediction, PredictionStatus, ReplicateModel};
pub use crate::schema::InputSchema;

/// Tracing target for Replicate client operations.
pub const TRACING_TARGET: &str = "noder_replicate";
