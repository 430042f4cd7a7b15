//! Chat-completion HTTP client.

use reqwest::Client;

use crate::config::ChatConfig;
use crate::error::{Error, Result};
use crate::types::{ApiErrorBody, ChatRequest, ChatResponse};
use crate::TRACING_TARGET;

/// HTTP client for an OpenAI-compatible chat-completions endpoint.
///
/// One client per vendor endpoint; cheap to clone. The client performs a
/// single request per [`complete`](Self::complete) call and classifies
/// non-2xx responses into retryable and terminal errors; retrying is the
/// caller's concern.
#[derive(Debug, Clone)]
pub struct ChatClient {
    /// Underlying HTTP client.
    http_client: Client,
    /// Endpoint configuration.
    config: ChatConfig,
}

impl ChatClient {
    /// Creates a new chat client from a configuration.
    pub fn new(config: ChatConfig) -> Result<Self> {
        let http_client = config
            .http()
            .bearer_client(config.api_key())
            .map_err(|e| Error::Config(e.to_string()))?;

        tracing::debug!(
            target: TRACING_TARGET,
            base_url = %config.base_url(),
            timeout = ?config.http().effective_timeout(),
            "Chat client initialized"
        );

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Performs one chat completion call.
    pub async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let url = self.config.completions_url()?;

        tracing::debug!(
            target: TRACING_TARGET,
            model = %request.model,
            message_count = request.messages.len(),
            "Requesting chat completion"
        );

        let response = self.http_client.post(url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = parse_error_message(&body)
                .unwrap_or_else(|| format!("chat completion failed: {}", body));

            tracing::warn!(
                target: TRACING_TARGET,
                status = status.as_u16(),
                model = %request.model,
                "Chat provider returned an error"
            );
            return Err(Error::from_status(status.as_u16(), message));
        }

        let completion: ChatResponse = response.json().await?;

        tracing::debug!(
            target: TRACING_TARGET,
            model = %request.model,
            choices = completion.choices.len(),
            "Chat completion received"
        );

        Ok(completion)
    }
}

/// Extracts the provider error message from an `{"error": {...}}` body.
fn parse_error_message(body: &str) -> Option<String> {
    let parsed: ApiErrorBody = serde_json::from_str(body).ok()?;
    parsed.error?.message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChatConfig;

    #[test]
    fn test_parse_error_message_extracts_provider_message() {
        let body = r#"{"error": {"message": "model not found", "details": {}}}"#;
        assert_eq!(parse_error_message(body).as_deref(), Some("model not found"));
    }

    #[test]
    fn test_parse_error_message_tolerates_unknown_bodies() {
        assert_eq!(parse_error_message("not json"), None);
        assert_eq!(parse_error_message(r#"{"unexpected": true}"#), None);
    }

    #[test]
    fn test_client_construction() {
        let config = ChatConfig::new("https://api.openai.com/v1", "sk-test").unwrap();
        let client = ChatClient::new(config).unwrap();
        assert_eq!(
            client.config().base_url().as_str(),
            "https://api.openai.com/v1"
        );
    }
}
