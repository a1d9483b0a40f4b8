//! Completion service client.
//!
//! This module provides the outbound side of the support chat: a small,
//! protocol-level abstraction over `OpenAI`-compatible Chat Completions
//! endpoints. The server calls it on behalf of the browser so the API key
//! never leaves the process.
//!
//! # Overview
//!
//! The [`CompletionDriver`] trait defines the single non-streaming call the
//! chat widget needs. [`ChatCompletionsDriver`] implements it over HTTP with
//! `reqwest`.
//!
//! # Example
//!
//! ```rust,ignore
//! use softsell_site::llm::{ChatCompletionsDriver, CompletionDriver, LlmSettings, WireMessage};
//!
//! let driver = ChatCompletionsDriver::new(LlmSettings::groq(Some(api_key)));
//! let reply = driver
//!     .complete(vec![WireMessage::user("What payment methods do you support?")])
//!     .await?;
//! ```

pub mod chat_completions;
pub mod provider;

pub use chat_completions::ChatCompletionsDriver;
pub use provider::Provider;

use serde::{Deserialize, Serialize};

/// Default completion endpoint base (Groq's `OpenAI`-compatible surface).
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default cap on generated tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 800;

/// LLM connection and model settings.
#[derive(Clone)]
pub struct LlmSettings {
    /// Base URL for the LLM API (e.g., `https://api.groq.com/openai`).
    pub base_url: String,
    /// Optional API key, sent as a bearer token.
    pub api_key: Option<String>,
    /// Model identifier.
    pub model: String,
    /// Sampling temperature sent with every request.
    pub temperature: f32,
    /// Maximum number of tokens the service may generate.
    pub max_tokens: u32,
    /// Provider type (auto-detected from `base_url`).
    pub provider: Provider,
}

impl std::fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("provider", &self.provider)
            .finish()
    }
}

impl LlmSettings {
    /// Settings pointing at Groq with the default model and sampling values.
    #[must_use]
    pub fn groq(api_key: Option<String>) -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_MODEL, api_key)
    }

    /// Settings for an arbitrary `OpenAI`-compatible endpoint.
    #[must_use]
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, api_key: Option<String>) -> Self {
        let base_url = base_url.into();
        let provider = Provider::detect_from_url(&base_url);
        Self {
            base_url,
            api_key,
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            provider,
        }
    }

    /// Full URL of the chat completions endpoint.
    #[must_use]
    pub fn chat_url(&self) -> String {
        self.provider.build_chat_url(&self.base_url)
    }
}

/// Role vocabulary of the completion service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireRole {
    /// System instruction.
    System,
    /// End-user turn.
    User,
    /// Model turn.
    Assistant,
}

/// A `{role, content}` pair as sent on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    /// Role of the message author.
    pub role: WireRole,
    /// Message text.
    pub content: String,
}

impl WireMessage {
    /// Create a system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: WireRole::System,
            content: content.into(),
        }
    }

    /// Create a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: WireRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: WireRole::Assistant,
            content: content.into(),
        }
    }
}

/// Errors raised by a [`CompletionDriver`].
///
/// Every variant is handled the same way by the chat widget: the user sees
/// one fallback message and the detail goes to the logs.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// Connection, TLS or body-read failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("completion service returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },

    /// The response body did not contain a usable reply.
    #[error("malformed completion response: {0}")]
    Malformed(String),

    /// No answer arrived within the configured timeout.
    #[error("completion request timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The owning session was closed while the request was in flight.
    #[error("completion request cancelled")]
    Cancelled,
}

/// Trait for completion service drivers.
///
/// Implementations send the full conversation (system instruction first) and
/// return the text of the first choice.
#[async_trait::async_trait]
pub trait CompletionDriver: Send + Sync {
    /// Request a single completion for `messages`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the service responds with a
    /// non-success status, or the body carries no reply.
    async fn complete(&self, messages: Vec<WireMessage>) -> Result<String, CompletionError>;
}
