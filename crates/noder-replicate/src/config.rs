//! Configuration for the Replicate client.

use noder_reqwest::HttpConfig;
use url::Url;

use crate::error::{Error, Result};

/// Default Replicate API base URL.
const DEFAULT_BASE_URL: &str = "https://api.replicate.com/v1";

/// Configuration for the Replicate API client.
#[derive(Debug, Clone)]
pub struct ReplicateConfig {
    /// API base URL.
    base_url: Url,
    /// Bearer token for the `Authorization` header.
    api_key: String,
    /// Shared HTTP settings (timeout, user agent).
    http: HttpConfig,
}

impl ReplicateConfig {
    /// Creates a configuration for the public Replicate API.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    /// Creates a configuration with a custom base URL.
    pub fn with_base_url(base_url: impl AsRef<str>, api_key: impl Into<String>) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())
            .map_err(|e| Error::Config(format!("invalid base URL: {}", e)))?;
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::Config("API key must not be empty".into()));
        }

        Ok(Self {
            base_url,
            api_key,
            http: HttpConfig::default(),
        })
    }

    /// Overrides the HTTP settings.
    pub fn with_http(mut self, http: HttpConfig) -> Self {
        self.http = http;
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

    /// Builds an endpoint URL from path segments under the base URL.
    pub(crate) fn endpoint<I, S>(&self, segments: I) -> Result<Url>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut url = self.base_url.clone();
        {
            let mut parts = url
                .path_segments_mut()
                .map_err(|_| Error::Config("base URL cannot be a base".into()))?;
            parts.pop_if_empty().extend(segments);
        }
        Ok(url)
    }
}
