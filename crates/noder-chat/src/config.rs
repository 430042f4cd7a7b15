//! Configuration for the chat client.

use std::time::Duration;

use noder_reqwest::HttpConfig;
use url::Url;

use crate::error::{Error, Result};

/// Default timeout for chat completion requests: 60 seconds.
pub const DEFAULT_CHAT_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for a chat-completion endpoint.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Base URL of the OpenAI-compatible API, e.g. `https://api.openai.com/v1`.
    base_url: Url,
    /// Bearer token for the `Authorization` header.
    api_key: String,
    /// Shared HTTP settings (timeout, user agent).
    http: HttpConfig,
}

impl ChatConfig {
    /// Creates a new configuration from a base URL and API key.
    pub fn new(base_url: impl AsRef<str>, api_key: impl Into<String>) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())
            .map_err(|e| Error::Config(format!("invalid base URL: {}", e)))?;
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::Config("API key must not be empty".into()));
        }

        Ok(Self {
            base_url,
            api_key,
            http: HttpConfig::default().with_timeout(DEFAULT_CHAT_TIMEOUT),
        })
    }

    /// Overrides the HTTP settings.
    pub fn with_http(mut self, http: HttpConfig) -> Self {
        self.http = http;
        self
    }

    /// Overrides the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Returns the HTTP settings.
    pub fn http(&self) -> &HttpConfig {
        &self.http
    }

    /// Returns the full URL of the chat-completions endpoint.
    pub fn completions_url(&self) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| Error::Config("base URL cannot be a base".into()))?;
            segments.pop_if_empty().extend(["chat", "completions"]);
        }
        Ok(url)
    }
}
