//! Error types for the Replicate client.

use noder_reqwest::Retryable;
use thiserror::Error;

/// Result type alias for Replicate client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to the prediction provider.
#[derive(Debug, Error)]
pub enum Error {
    /// Client configuration is invalid.
    #[error("invalid replicate client config: {0}")]
    Config(String),

    /// The provider rejected the request credentials.
    #[error("replicate authentication failed ({status}): {message}")]
    Auth {
        /// HTTP status code (401 or 403).
        status: u16,
        /// Provider-supplied error message.
        message: String,
    },

    /// The provider returned a non-2xx response.
    #[error("replicate API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Provider-supplied error message.
        message: String,
    },

    /// The prediction reached the `failed` terminal state.
    #[error("prediction failed: {message}")]
    PredictionFailed {
        /// Provider-supplied error, or a generic fallback.
        message: String,
    },

    /// The prediction reached the `canceled` terminal state.
    #[error("prediction was canceled")]
    PredictionCanceled,

    /// The poll attempt budget ran out before a terminal state.
    #[error("prediction timed out after {attempts} poll attempts")]
    PollTimeout {
        /// Number of poll attempts performed.
        attempts: u32,
    },

    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl Error {
    /// Builds an API error from a status code and provider message,
    /// classifying 401/403 as authentication failures.
    pub(crate) fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => Error::Auth { status, message },
            _ => Error::Api { status, message },
        }
    }
}

impl Retryable for Error {
    fn is_retryable(&self) -> bool {
        match self {
            Error::Api { status, .. } => *status == 429 || *status >= 500,
            Error::Reqwest(e) => e.is_timeout() || e.is_connect(),
            // Terminal prediction states and the poll timeout are provider
            // outcomes, not transport faults; retrying is a user decision.
            Error::Auth { .. }
            | Error::Config(_)
            | Error::PredictionFailed { .. }
            | Error::PredictionCanceled
            | Error::PollTimeout { .. }
            | Error::Serde(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_and_server_errors_are_retryable() {
        assert!(Error::from_status(429, "rate limited".into()).is_retryable());
        assert!(Error::from_status(502, "bad gateway".into()).is_retryable());
    }

    #[test]
    fn test_client_and_auth_errors_are_not_retryable() {
        assert!(!Error::from_status(400, "bad input".into()).is_retryable());
        assert!(!Error::from_status(401, "bad token".into()).is_retryable());
        assert!(!Error::from_status(404, "no model".into()).is_retryable());
    }

    #[test]
    fn test_terminal_prediction_outcomes_are_not_retryable() {
        assert!(
            !Error::PredictionFailed {
                message: "NSFW content".into()
            }
            .is_retryable()
        );
        assert!(!Error::PredictionCanceled.is_retryable());
        assert!(!Error::PollTimeout { attempts: 300 }.is_retryable());
    }
}
