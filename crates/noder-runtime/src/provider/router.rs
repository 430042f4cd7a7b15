use crate::provider::Provider;

/// Model owners served over a chat-completions API rather than Replicate.
const CHAT_OWNERS: &[&str] = &[
    "openai",
    "anthropic",
    "google",
    "gemini",
    "meta-llama",
    "mistralai",
    "deepseek",
    "qwen",
    "x-ai",
];

/// How a model identifier should be invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderRoute {
    /// Synchronous chat-completion request.
    Chat(ChatVendor),
    /// Asynchronous create-then-poll prediction on Replicate.
    Poll,
}

impl ProviderRoute {
    /// Routes a model identifier by its owner prefix.
    ///
    /// Identifiers without an owner prefix, and owners outside the chat
    /// allowlist, go to Replicate. Owner matching is case-insensitive.
    pub fn for_model(model_id: &str) -> Self {
        let Some((owner, _)) = model_id.split_once('/') else {
            return Self::Poll;
        };
        let owner = owner.to_ascii_lowercase();
        if !CHAT_OWNERS.contains(&owner.as_str()) {
            return Self::Poll;
        }

        let vendor = match owner.as_str() {
            "openai" => ChatVendor::OpenAi,
            "anthropic" => ChatVendor::Anthropic,
            "google" | "gemini" => ChatVendor::Gemini,
            _ => ChatVendor::OpenRouter,
        };
        Self::Chat(vendor)
    }
}

/// Concrete chat-completions endpoint for a chat-routed model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ChatVendor {
    /// First-party OpenAI API.
    OpenAi,
    /// Anthropic's OpenAI-compatible API.
    Anthropic,
    /// Google's OpenAI-compatible Gemini API.
    Gemini,
    /// OpenRouter aggregation layer.
    OpenRouter,
}

impl ChatVendor {
    /// Base URL of the vendor's chat-completions API.
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1",
            Self::Anthropic => "https://api.anthropic.com/v1",
            Self::Gemini => "https://generativelanguage.googleapis.com/v1beta/openai",
            Self::OpenRouter => "https://openrouter.ai/api/v1",
        }
    }

    /// Provider whose credentials authenticate against this vendor.
    pub fn provider(&self) -> Provider {
        match self {
            Self::OpenAi => Provider::OpenAi,
            Self::Anthropic => Provider::Anthropic,
            Self::Gemini => Provider::Gemini,
            Self::OpenRouter => Provider::OpenRouter,
        }
    }

    /// Model name to send in the request body.
    ///
    /// First-party APIs expect the bare model name; OpenRouter keeps the
    /// `owner/model` form.
    pub fn request_model<'a>(&self, model_id: &'a str) -> &'a str {
        match self {
            Self::OpenRouter => model_id,
            _ => model_id
                .split_once('/')
                .map(|(_, name)| name)
                .unwrap_or(model_id),
        }
    }
}
