//! Provider detection for `OpenAI`-compatible completion services.
//!
//! Only the endpoint layout differs between the providers we talk to; the
//! request body and bearer auth are the same everywhere.

/// Supported completion providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Groq (api.groq.com/openai)
    Groq,
    /// `OpenAI` (api.openai.com)
    OpenAI,
    /// `OpenRouter` (openrouter.ai/api)
    OpenRouter,
    /// Any other OpenAI-compatible server, e.g. a local gateway.
    Generic,
}

impl Provider {
    /// Detect provider from base URL.
    ///
    /// # Example
    ///
    /// ```rust
    /// use softsell_site::llm::Provider;
    ///
    /// assert_eq!(Provider::detect_from_url("https://api.groq.com/openai"), Provider::Groq);
    /// ```
    #[must_use]
    pub fn detect_from_url(base_url: &str) -> Self {
        let host = url::Url::parse(base_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_lowercase))
            .unwrap_or_default();

        if host.ends_with("groq.com") {
            Self::Groq
        } else if host.ends_with("openrouter.ai") {
            Self::OpenRouter
        } else if host.ends_with("openai.com") {
            Self::OpenAI
        } else {
            Self::Generic
        }
    }

    /// Build the chat completions URL for this provider.
    ///
    /// A base that already ends in `/v1` is not doubled.
    #[must_use]
    pub fn build_chat_url(self, base_url: &str) -> String {
        let base = base_url.trim_end_matches('/');
        if base.ends_with("/v1") {
            format!("{base}/chat/completions")
        } else {
            format!("{base}/v1/chat/completions")
        }
    }

    /// Whether requests without a bearer token are expected to be rejected.
    #[must_use]
    pub fn requires_api_key(self) -> bool {
        !matches!(self, Self::Generic)
    }
}
