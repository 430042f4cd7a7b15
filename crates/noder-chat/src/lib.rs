//! Chat-completion provider client.
//!
//! Speaks the OpenAI-compatible `/chat/completions` wire protocol used by
//! OpenAI, OpenRouter, Anthropic's and Gemini's compatibility endpoints.
//! The client performs a single synchronous call per completion; transient
//! failures are retried one layer up via `noder_reqwest::RetryConfig`.
//!
//! ```ignore
//! use noder_chat::{ChatClient, ChatConfig, ChatMessage, ChatRequest};
//!
//! let config = ChatConfig::new("https://api.openai.com/v1", "sk-...")?;
//! let client = ChatClient::new(config)?;
//!
//! let request = ChatRequest::new("gpt-4o")
//!     .with_system("You are a helpful assistant")
//!     .with_user_text("Write a haiku about graphs");
//! let content = client.complete(&request).await?.first_content()?;
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod client;
mod config;
mod error;
mod types;

pub use crate::client::ChatClient;
pub use crate::config::{ChatConfig, DEFAULT_CHAT_TIMEOUT};
pub use crate::error::{Error, Result};
pub use crate::types::{
    ChatChoice, ChatMessage, ChatRequest, ChatResponse, ContentPart, ImageUrl, MessageContent,
    ResponseMessage, Usage,
};

/// Tracing target for chat client operations.
pub const TRACING_TARGET: &str = "noder_chat";
