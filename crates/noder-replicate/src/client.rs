//! Replicate HTTP client.

use reqwest::Client;
use serde_json::{Value, json};

use crate::TRACING_TARGET;
use crate::config::ReplicateConfig;
use crate::error::{Error, Result};
use crate::prediction::{ModelRef, Prediction, ReplicateModel};
use crate::schema::InputSchema;

/// HTTP client for the Replicate predictions API.
///
/// Cheap to clone. Each method performs a single request; retry policy and
/// the poll loop live in [`poll`](crate::poll) and the caller's retry
/// layer.
#[derive(Debug, Clone)]
pub struct ReplicateClient {
    /// Underlying HTTP client.
    http_client: Client,
    /// Endpoint configuration.
    config: ReplicateConfig,
}

impl ReplicateClient {
    /// Creates a new Replicate client from a configuration.
    pub fn new(config: ReplicateConfig) -> Result<Self> {
        let http_client = config
            .http()
            .bearer_client(config.api_key())
            .map_err(|e| Error::Config(e.to_string()))?;

        tracing::debug!(
            target: TRACING_TARGET,
            base_url = %config.base_url(),
            "Replicate client initialized"
        );

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &ReplicateConfig {
        &self.config
    }

    /// Creates a prediction for a model reference.
    ///
    /// `owner/model` references use the model-scoped endpoint with a bare
    /// `{input}` body; pinned or bare version ids use the generic
    /// `/predictions` endpoint with a `{version, input}` body.
    pub async fn create_prediction(&self, model: &str, input: Value) -> Result<Prediction> {
        let (url, body) = match ModelRef::parse(model) {
            ModelRef::Official { owner, name } => (
                self.config
                    .endpoint(["models", &owner, &name, "predictions"])?,
                json!({ "input": input }),
            ),
            ModelRef::Versioned { version } => (
                self.config.endpoint(["predictions"])?,
                json!({ "version": version, "input": input }),
            ),
        };

        tracing::debug!(
            target: TRACING_TARGET,
            model,
            endpoint = %url,
            "Creating prediction"
        );

        let response = self.http_client.post(url).json(&body).send().await?;
        let prediction: Prediction = Self::parse_response(response).await?;

        tracing::debug!(
            target: TRACING_TARGET,
            prediction_id = %prediction.id,
            status = %prediction.status,
            "Prediction created"
        );

        Ok(prediction)
    }

    /// Fetches the current state of a prediction.
    pub async fn get_prediction(&self, prediction_id: &str) -> Result<Prediction> {
        let url = self.config.endpoint(["predictions", prediction_id])?;
        let response = self.http_client.get(url).send().await?;
        Self::parse_response(response).await
    }

    /// Requests cancellation of a running prediction.
    pub async fn cancel_prediction(&self, prediction_id: &str) -> Result<Prediction> {
        let url = self
            .config
            .endpoint(["predictions", prediction_id, "cancel"])?;
        let response = self.http_client.post(url).send().await?;
        Self::parse_response(response).await
    }

    /// Fetches model metadata, including the latest version.
    pub async fn get_model(&self, owner: &str, name: &str) -> Result<ReplicateModel> {
        let url = self.config.endpoint(["models", owner, name])?;
        let response = self.http_client.get(url).send().await?;
        Self::parse_response(response).await
    }

    /// Fetches the input schema for an `owner/model` reference.
    ///
    /// Returns `Ok(None)` for version-pinned references and for models
    /// that publish no usable schema; fetch failures are propagated so the
    /// caller can decide to fall back.
    pub async fn get_input_schema(&self, model: &str) -> Result<Option<InputSchema>> {
        let ModelRef::Official { owner, name } = ModelRef::parse(model) else {
            return Ok(None);
        };

        let model_meta = self.get_model(&owner, &name).await?;
        Ok(InputSchema::from_model(&model_meta))
    }

    /// Decodes a JSON response, mapping non-2xx statuses to typed errors.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = parse_error_detail(&body).unwrap_or(body);
            tracing::warn!(
                target: TRACING_TARGET,
                status = status.as_u16(),
                "Replicate returned an error"
            );
            return Err(Error::from_status(status.as_u16(), message));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Extracts the `detail` or `title` message from an error body.
fn parse_error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .or_else(|| value.get("title"))?
        .as_str()
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_detail() {
        assert_eq!(
            parse_error_detail(r#"{"detail": "Invalid version"}"#).as_deref(),
            Some("Invalid version")
        );
        assert_eq!(
            parse_error_detail(r#"{"title": "Unauthenticated"}"#).as_deref(),
            Some("Unauthenticated")
        );
        assert_eq!(parse_error_detail("plain text"), None);
    }

    #[test]
    fn test_client_construction() {
        let config = ReplicateConfig::new("r8_test").unwrap();
        let client = ReplicateClient::new(config).unwrap();
        assert_eq!(
            client.config().base_url().as_str(),
            "https://api.replicate.com/v1"
        );
    }
}
