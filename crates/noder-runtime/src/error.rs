use noder_reqwest::Retryable;

use crate::definition::NodeId;
use crate::provider::Provider;

/// Specialized [`Result`] alias for workflow operations.
pub type WorkflowResult<T, E = WorkflowError> = Result<T, E>;

/// Error type for workflow compilation and execution.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// A node's form data is missing or malformed.
    #[error("invalid configuration for node {node_id}: {message}")]
    InvalidNodeConfig {
        /// Node that failed validation.
        node_id: NodeId,
        /// Human-readable reason.
        message: String,
    },
    /// No API key is configured for the required provider.
    #[error("missing api key for provider: {0}")]
    MissingApiKey(Provider),
    /// The workflow graph contains a cycle and has no valid execution order.
    #[error("workflow graph contains a cycle")]
    CycleDetected,
    /// Another run is already in progress on this engine.
    #[error("a workflow run is already in progress")]
    AlreadyRunning,
    /// A node's generation failed after all retries.
    #[error("node {node_id} failed: {message}")]
    NodeFailed {
        /// Node whose invocation failed.
        node_id: NodeId,
        /// Provider-reported or internal failure message.
        message: String,
    },
    /// Provider returned output in a shape we cannot interpret.
    #[error("unexpected provider output: {0}")]
    UnexpectedOutput(String),
    /// Chat completion request failed.
    #[error(transparent)]
    Chat(#[from] noder_chat::Error),
    /// Replicate prediction request failed.
    #[error(transparent)]
    Prediction(#[from] noder_replicate::Error),
    /// Underlying HTTP transport failure.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// HTTP client construction failure.
    #[error(transparent)]
    HttpClient(#[from] noder_reqwest::ClientError),
    /// Payload serialization or deserialization failure.
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl Retryable for WorkflowError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Chat(error) => error.is_retryable(),
            Self::Prediction(error) => error.is_retryable(),
            Self::Http(error) => error.is_timeout() || error.is_connect(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_terminal() {
        let error = WorkflowError::InvalidNodeConfig {
            node_id: NodeId::from("n1"),
            message: "model is required".to_owned(),
        };
        assert!(!error.is_retryable());
        assert!(!WorkflowError::CycleDetected.is_retryable());
        assert!(!WorkflowError::MissingApiKey(Provider::Replicate).is_retryable());
    }

    #[test]
    fn test_chat_rate_limit_is_retryable() {
        let error = WorkflowError::Chat(noder_chat::Error::Api {
            status: 429,
            message: "rate limited".to_owned(),
        });
        assert!(error.is_retryable());
    }

    #[test]
    fn test_prediction_failure_is_terminal() {
        let error = WorkflowError::Prediction(noder_replicate::Error::PredictionFailed {
            message: "NSFW content detected".to_owned(),
        });
        assert!(!error.is_retryable());
    }
}
