use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{WorkflowError, WorkflowResult};

/// External service a node's generation is billed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(strum::Display, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Provider {
    /// OpenAI chat completions.
    OpenAi,
    /// OpenRouter aggregated chat completions.
    OpenRouter,
    /// Anthropic OpenAI-compatible endpoint.
    Anthropic,
    /// Replicate hosted predictions.
    Replicate,
    /// Google Gemini OpenAI-compatible endpoint.
    Gemini,
}

/// API keys keyed by provider.
#[derive(Default, Clone)]
pub struct CredentialsStore {
    keys: HashMap<Provider, String>,
}

impl CredentialsStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key for a provider, dropping blank values.
    pub fn with_key(mut self, provider: Provider, api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        if !api_key.trim().is_empty() {
            self.keys.insert(provider, api_key);
        }
        self
    }

    /// Returns the API key for a provider, if configured.
    pub fn get(&self, provider: Provider) -> Option<&str> {
        self.keys.get(&provider).map(String::as_str)
    }

    /// Returns the API key for a provider, or an error naming what is missing.
    pub fn require(&self, provider: Provider) -> WorkflowResult<&str> {
        self.get(provider)
            .ok_or(WorkflowError::MissingApiKey(provider))
    }
}

impl std::fmt::Debug for CredentialsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never log key material.
        f.debug_struct("CredentialsStore")
            .field("providers", &self.keys.keys().collect::<Vec<_>>())
            .finish()
    }
}
