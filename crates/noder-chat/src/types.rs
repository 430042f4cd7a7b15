//! Wire types for the OpenAI-compatible chat protocol.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// A chat completion request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model identifier, e.g. `gpt-4o` or `meta-llama/llama-3.3-70b-instruct`.
    pub model: String,
    /// Conversation messages, system prompt first.
    pub messages: Vec<ChatMessage>,
    /// Optional tool definitions, passed through verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Value>,
    /// Optional tool choice directive, passed through verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<Value>,
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Completion token budget.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Creates a request for a model with no messages.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            tools: None,
            tool_choice: None,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Prepends a system message.
    pub fn with_system(mut self, content: impl Into<String>) -> Self {
        self.messages.insert(0, ChatMessage::system(content));
        self
    }

    /// Appends a plain-text user message.
    pub fn with_user_text(mut self, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage::user_text(content));
        self
    }

    /// Appends a multimodal user message.
    pub fn with_user_parts(mut self, parts: Vec<ContentPart>) -> Self {
        self.messages.push(ChatMessage::user_parts(parts));
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the completion token budget.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// A single conversation message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role: `system`, `user` or `assistant`.
    pub role: String,
    /// Message content, plain text or multimodal parts.
    pub content: MessageContent,
}

impl ChatMessage {
    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: MessageContent::Text(content.into()),
        }
    }

    /// Creates a plain-text user message.
    pub fn user_text(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: MessageContent::Text(content.into()),
        }
    }

    /// Creates a multimodal user message.
    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self {
            role: "user".into(),
            content: MessageContent::Parts(parts),
        }
    }
}

/// Message content: a bare string or an array of typed parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain text content.
    Text(String),
    /// Multimodal content parts.
    Parts(Vec<ContentPart>),
}

/// One part of a multimodal message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Text fragment.
    Text {
        /// The text.
        text: String,
    },
    /// Image reference (remote URL or data URL).
    ImageUrl {
        /// The image location.
        image_url: ImageUrl,
    },
}

impl ContentPart {
    /// Creates a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Creates an image part from a URL or data URL.
    pub fn image_url(url: impl Into<String>) -> Self {
        Self::ImageUrl {
            image_url: ImageUrl { url: url.into() },
        }
    }
}

/// Image reference within a content part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageUrl {
    /// Image URL or `data:` URL.
    pub url: String,
}

/// A chat completion response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Completion choices; the first one carries the result.
    pub choices: Vec<ChatChoice>,
    /// Token accounting, when the provider reports it.
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatResponse {
    /// Returns the first choice's message content.
    ///
    /// An empty choice list or a choice without content is surfaced as
    /// [`Error::EmptyResponse`].
    pub fn first_content(&self) -> Result<String> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or(Error::EmptyResponse)
    }
}

/// One completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    /// The assistant message.
    pub message: ResponseMessage,
    /// Why generation stopped.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// The assistant message within a choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    /// Generated content; absent for pure tool-call responses.
    #[serde(default)]
    pub content: Option<String>,
    /// Tool calls, passed through verbatim.
    #[serde(default)]
    pub tool_calls: Option<Value>,
}

/// Token usage accounting.
#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    /// Prompt tokens consumed.
    #[serde(default)]
    pub prompt_tokens: Option<u64>,
    /// Completion tokens produced.
    #[serde(default)]
    pub completion_tokens: Option<u64>,
    /// Total tokens.
    #[serde(default)]
    pub total_tokens: Option<u64>,
}

/// Error body shape on non-2xx responses: `{"error": {"message": ...}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_text_content_as_string() {
        let request = ChatRequest::new("gpt-4o")
            .with_system("sys")
            .with_user_text("hello");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "sys");
        assert_eq!(json["messages"][1]["content"], "hello");
        assert!(json.get("tools").is_none());
    }

    #[test]
    fn test_request_serializes_multimodal_parts() {
        let request = ChatRequest::new("gpt-4o").with_user_parts(vec![
            ContentPart::text("describe this"),
            ContentPart::image_url("data:image/png;base64,AAAA"),
        ]);
        let json = serde_json::to_value(&request).unwrap();

        let parts = &json["messages"][0]["content"];
        assert_eq!(parts[0]["type"], "text");
        assert_eq!(parts[1]["type"], "image_url");
        assert_eq!(parts[1]["image_url"]["url"], "data:image/png;base64,AAAA");
    }

    #[test]
    fn test_first_content_returns_first_choice() {
        let response: ChatResponse = serde_json::from_value(serde_json::json!({
            "choices": [
                {"message": {"content": "one"}, "finish_reason": "stop"},
                {"message": {"content": "two"}}
            ]
        }))
        .unwrap();
        assert_eq!(response.first_content().unwrap(), "one");
    }

    #[test]
    fn test_first_content_rejects_empty_choices() {
        let response: ChatResponse =
            serde_json::from_value(serde_json::json!({"choices": []})).unwrap();
        assert!(matches!(
            response.first_content(),
            Err(Error::EmptyResponse)
        ));
    }
}
