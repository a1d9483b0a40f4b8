//! Support chat widget core.
//!
//! The widget is modelled as a reducer ([`ChatState`]) driven by
//! [`ChatAction`]s, plus a [`ChatService`] that performs the one piece of
//! I/O: asking the completion service for a reply.
//!
//! # Lifecycle of a submit
//!
//! 1. `Submit(text)` appends the user message, clears the input and sets
//!    `loading`. It is rejected when the text is blank or a request is
//!    already in flight.
//! 2. The service sends system instruction + transcript + new message,
//!    bounded by a timeout and the session's cancellation token.
//! 3. The reply (or the fixed fallback text on any failure) is appended and
//!    `loading` is cleared.
//!
//! # Example
//!
//! ```rust
//! use softsell_site::chat::{ChatAction, ChatState, Effect};
//!
//! let mut state = ChatState::new();
//! let effect = state.apply(ChatAction::Submit("Do you buy CRM licenses?".into()));
//! assert!(matches!(effect, Effect::Complete(_)));
//! assert!(state.loading);
//! ```

pub mod prompt;
mod service;
mod state;

pub use prompt::{FALLBACK_MESSAGE, SYSTEM_PROMPT, WELCOME_MESSAGE};
pub use service::{ChatService, DEFAULT_REQUEST_TIMEOUT};
pub use state::{ChatAction, ChatState, Effect, Rejection};

use serde::{Deserialize, Serialize};

/// Author of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The visitor.
    User,
    /// The support bot.
    Assistant,
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who wrote it.
    pub role: ChatRole,
    /// What was written.
    pub text: String,
}

impl ChatMessage {
    /// A visitor message.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    /// A bot message.
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
        }
    }
}
