//! Shared construction of provider HTTP clients.
//!
//! Every outbound client in the workspace is a reqwest [`Client`] with a
//! request timeout and a workspace User-Agent; the provider API clients
//! additionally carry a bearer `Authorization` header and a JSON
//! content type. [`HttpConfig`] owns those common pieces so the provider
//! crates only keep what differs between them (endpoint and credentials).

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};

/// Default timeout for HTTP requests: 30 seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from building a provider HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The API key contains bytes that cannot form an `Authorization` header.
    #[error("api key is not a valid header value")]
    InvalidApiKey,
    /// Underlying reqwest client construction failed.
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Settings shared by every outbound provider client.
///
/// Unset fields fall back to workspace defaults; a provider crate layers
/// its own default on top (chat completions use a longer timeout than the
/// 30-second baseline, for example).
#[derive(Debug, Default, Clone)]
pub struct HttpConfig {
    /// Request timeout; `None` means [`DEFAULT_TIMEOUT`].
    timeout: Option<Duration>,
    /// User-Agent header; `None` means the workspace default.
    user_agent: Option<String>,
}

impl HttpConfig {
    /// Creates a configuration using workspace defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Returns the timeout that will be applied to built clients.
    pub fn effective_timeout(&self) -> Duration {
        self.timeout
            .filter(|timeout| !timeout.is_zero())
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Returns the User-Agent that will be applied to built clients.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .filter(|agent| !agent.is_empty())
            .unwrap_or_else(|| format!("noder/{}", env!("CARGO_PKG_VERSION")))
    }

    /// Builds a client with no default headers.
    ///
    /// Used for fetching public assets (upstream image URLs) where no
    /// credentials must leak.
    pub fn client(&self) -> Result<Client, ClientError> {
        Ok(self.builder().build()?)
    }

    /// Builds a JSON API client authenticated with a bearer token.
    ///
    /// The `Authorization` header is marked sensitive so it never shows up
    /// in debug output.
    pub fn bearer_client(&self, api_key: &str) -> Result<Client, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let auth = format!("Bearer {api_key}");
        let mut auth_value =
            HeaderValue::from_str(&auth).map_err(|_| ClientError::InvalidApiKey)?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        Ok(self.builder().default_headers(headers).build()?)
    }

    fn builder(&self) -> reqwest::ClientBuilder {
        Client::builder()
            .timeout(self.effective_timeout())
            .user_agent(self.effective_user_agent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_fields_fall_back_to_workspace_defaults() {
        let config = HttpConfig::new();
        assert_eq!(config.effective_timeout(), DEFAULT_TIMEOUT);
        assert!(config.effective_user_agent().starts_with("noder/"));
    }

    #[test]
    fn test_zero_timeout_falls_back_to_default() {
        let config = HttpConfig::new().with_timeout(Duration::ZERO);
        assert_eq!(config.effective_timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_overrides_apply_to_built_clients() {
        let config = HttpConfig::new()
            .with_timeout(Duration::from_secs(90))
            .with_user_agent("noder-test/0.0");
        assert_eq!(config.effective_timeout(), Duration::from_secs(90));
        assert_eq!(config.effective_user_agent(), "noder-test/0.0");
        assert!(config.client().is_ok());
    }

    #[test]
    fn test_bearer_client_accepts_a_normal_key() {
        let config = HttpConfig::new();
        assert!(config.bearer_client("sk-test-123").is_ok());
    }

    #[test]
    fn test_bearer_client_rejects_unencodable_keys() {
        let config = HttpConfig::new();
        let result = config.bearer_client("sk-bad\nkey");
        assert!(matches!(result, Err(ClientError::InvalidApiKey)));
    }
}
