//! Reducer for the chat widget.
//!
//! All widget state lives in [`ChatState`] and only changes through
//! [`ChatState::apply`]. The reducer never performs I/O: a successful
//! submit returns [`Effect::Complete`] with the payload to send, and the
//! caller feeds the outcome back as another action.

use serde::Serialize;

use super::prompt::{FALLBACK_MESSAGE, WELCOME_MESSAGE, build_payload};
use super::ChatMessage;
use crate::llm::WireMessage;

/// Everything the widget renders from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatState {
    /// Messages in display order. Never empty.
    pub transcript: Vec<ChatMessage>,
    /// Current contents of the input field.
    pub input: String,
    /// A completion request is in flight.
    pub loading: bool,
    /// Widget panel is expanded.
    pub open: bool,
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new()
    }
}

/// Inputs to the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatAction {
    /// Expand the panel.
    Open,
    /// Collapse the panel.
    Close,
    /// Flip the panel.
    Toggle,
    /// Replace the input buffer.
    SetInput(String),
    /// Send a user message.
    Submit(String),
    /// The completion service answered.
    CompletionSucceeded(String),
    /// The completion failed, timed out, or was cancelled.
    CompletionFailed,
}

/// Why a submit was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Input was empty after trimming.
    Blank,
    /// Another request is still in flight.
    Busy,
}

/// What the caller has to do after an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Nothing.
    None,
    /// Submit was ignored; state is unchanged.
    Rejected(Rejection),
    /// Send this payload to the completion service.
    Complete(Vec<WireMessage>),
}

impl ChatState {
    /// Fresh state: closed, idle, transcript seeded with the welcome message.
    #[must_use]
    pub fn new() -> Self {
        Self {
            transcript: vec![ChatMessage::assistant(WELCOME_MESSAGE)],
            input: String::new(),
            loading: false,
            open: false,
        }
    }

    /// Apply an action and report the resulting effect.
    pub fn apply(&mut self, action: ChatAction) -> Effect {
        match action {
            ChatAction::Open => self.open = true,
            ChatAction::Close => self.open = false,
            ChatAction::Toggle => self.open = !self.open,
            ChatAction::SetInput(text) => self.input = text,
            ChatAction::Submit(text) => return self.submit(text),
            ChatAction::CompletionSucceeded(reply) => self.finish(reply),
            ChatAction::CompletionFailed => self.finish(FALLBACK_MESSAGE.to_string()),
        }
        Effect::None
    }

    fn submit(&mut self, text: String) -> Effect {
        if text.trim().is_empty() {
            return Effect::Rejected(Rejection::Blank);
        }
        if self.loading {
            return Effect::Rejected(Rejection::Busy);
        }

        let payload = build_payload(&self.transcript, &text);
        self.transcript.push(ChatMessage::user(text));
        self.input.clear();
        self.loading = true;
        Effect::Complete(payload)
    }

    fn finish(&mut self, reply: String) {
        // A late answer for a request that was already settled is dropped.
        if !self.loading {
            tracing::warn!("Dropping completion outcome with no request in flight");
            return;
        }
        self.transcript.push(ChatMessage::assistant(reply));
        self.loading = false;
    }

    /// Text of the newest message.
    #[must_use]
    pub fn last_text(&self) -> &str {
        self.transcript.last().map_or("", |m| m.text.as_str())
    }
}
