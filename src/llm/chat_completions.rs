//! `OpenAI` Chat Completions API driver.
//!
//! This module implements the [`CompletionDriver`] trait for the Chat
//! Completions API (`/v1/chat/completions`) in its non-streaming form.

use serde::{Deserialize, Serialize};

use super::{CompletionDriver, CompletionError, LlmSettings, WireMessage};

/// Longest slice of an error body kept for the logs.
const MAX_ERROR_BODY: usize = 512;

/// Largest successful response body the driver will read.
pub const MAX_RESPONSE_BODY: usize = 1024 * 1024;

/// Request body for `/v1/chat/completions`.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    /// Model identifier.
    pub model: &'a str,
    /// Conversation, system instruction first.
    pub messages: &'a [WireMessage],
    /// Sampling temperature.
    pub temperature: f32,
    /// Generation cap.
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Driver for the `OpenAI` Chat Completions API.
#[derive(Clone)]
pub struct ChatCompletionsDriver {
    http: reqwest::Client,
    settings: LlmSettings,
}

impl std::fmt::Debug for ChatCompletionsDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsDriver")
            .field("settings", &self.settings)
            .finish()
    }
}

impl ChatCompletionsDriver {
    /// Create a new Chat Completions driver with the given settings.
    #[must_use]
    pub fn new(settings: LlmSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
        }
    }
}

fn too_large() -> CompletionError {
    CompletionError::Malformed(format!("response body exceeds {MAX_RESPONSE_BODY} bytes"))
}

#[async_trait::async_trait]
impl CompletionDriver for ChatCompletionsDriver {
    async fn complete(&self, messages: Vec<WireMessage>) -> Result<String, CompletionError> {
        let url = self.settings.chat_url();
        let body = ChatCompletionRequest {
            model: &self.settings.model,
            messages: &messages,
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        tracing::debug!(
            url = %url,
            model = %self.settings.model,
            message_count = messages.len(),
            "Sending completion request"
        );

        let mut rb = self.http.post(&url).json(&body);
        if let Some(k) = &self.settings.api_key {
            rb = rb.bearer_auth(k);
        }

        let mut resp = rb.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let mut body = resp.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        if resp
            .content_length()
            .is_some_and(|len| len > MAX_RESPONSE_BODY as u64)
        {
            return Err(too_large());
        }
        let mut bytes = Vec::new();
        while let Some(chunk) = resp.chunk().await? {
            if bytes.len() + chunk.len() > MAX_RESPONSE_BODY {
                return Err(too_large());
            }
            bytes.extend_from_slice(&chunk);
        }
        let parsed: ChatCompletionResponse = serde_json::from_slice(&bytes)
            .map_err(|e| CompletionError::Malformed(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| CompletionError::Malformed("response has no reply text".to_string()))
    }
}
