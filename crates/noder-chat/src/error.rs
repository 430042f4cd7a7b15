//! Error types for the chat client.

use noder_reqwest::Retryable;
use thiserror::Error;

/// Result type alias for chat client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to a chat-completion provider.
#[derive(Debug, Error)]
pub enum Error {
    /// Client configuration is invalid.
    #[error("invalid chat client config: {0}")]
    Config(String),

    /// The provider rejected the request credentials.
    #[error("chat provider authentication failed ({status}): {message}")]
    Auth {
        /// HTTP status code (401 or 403).
        status: u16,
        /// Provider-supplied error message.
        message: String,
    },

    /// The provider returned a non-2xx response.
    #[error("chat provider error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Provider-supplied error message.
        message: String,
    },

    /// The response carried no choices.
    #[error("no content in chat response")]
    EmptyResponse,

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
            // 429 and 5xx are transient; everything else in the 4xx range
            // (including auth failures) is not.
            Error::Api { status, .. } => *status == 429 || *status >= 500,
            Error::Reqwest(e) => e.is_timeout() || e.is_connect(),
            Error::Auth { .. } | Error::Config(_) | Error::EmptyResponse | Error::Serde(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_errors_are_not_retryable() {
        assert!(!Error::from_status(401, "bad key".into()).is_retryable());
        assert!(!Error::from_status(403, "forbidden".into()).is_retryable());
    }

    #[test]
    fn test_client_errors_are_not_retryable() {
        assert!(!Error::from_status(400, "bad request".into()).is_retryable());
        assert!(!Error::from_status(404, "no model".into()).is_retryable());
    }

    #[test]
    fn test_rate_limit_and_server_errors_are_retryable() {
        assert!(Error::from_status(429, "slow down".into()).is_retryable());
        assert!(Error::from_status(500, "oops".into()).is_retryable());
        assert!(Error::from_status(503, "overloaded".into()).is_retryable());
    }
}
