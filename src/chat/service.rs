//! Runs the completion side of a submit.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use uuid::Uuid;

use super::{ChatAction, ChatMessage, Effect, FALLBACK_MESSAGE, Rejection};
use crate::llm::{CompletionDriver, CompletionError, WireMessage};
use crate::session::Session;

/// Default bound on a single completion call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends submitted messages to the completion service and records the outcome.
///
/// Cheap to clone; clones share the driver.
#[derive(Clone)]
pub struct ChatService {
    driver: Arc<dyn CompletionDriver>,
    timeout: Duration,
}

impl std::fmt::Debug for ChatService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatService")
            .field("driver", &"CompletionDriver")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ChatService {
    /// Create a service around `driver` with the given per-request timeout.
    pub fn new(driver: Arc<dyn CompletionDriver>, timeout: Duration) -> Self {
        Self { driver, timeout }
    }

    /// Submit `text` and wait for the assistant message it produced.
    ///
    /// The returned message is either the service's reply or the fallback
    /// text; failures never surface as errors here. The completion runs on
    /// its own task, so dropping this future still settles the session.
    ///
    /// # Errors
    ///
    /// Returns the [`Rejection`] when the text is blank or the session is
    /// already waiting on a reply. The session is left untouched.
    pub async fn submit(
        &self,
        session: &Session,
        text: impl Into<String>,
    ) -> Result<ChatMessage, Rejection> {
        let task = self.spawn(session, text.into())?;
        Ok(task.await.unwrap_or_else(|e| {
            tracing::error!(session_id = %session.id(), error = %e, "Completion task failed");
            ChatMessage::assistant(FALLBACK_MESSAGE)
        }))
    }

    /// Submit `text` and finish the completion on a background task.
    ///
    /// Returns as soon as the user message is recorded, so the caller can
    /// render the loading state.
    ///
    /// # Errors
    ///
    /// Same as [`ChatService::submit`].
    pub fn submit_detached(&self, session: &Session, text: impl Into<String>) -> Result<(), Rejection> {
        self.spawn(session, text.into()).map(drop)
    }

    fn spawn(&self, session: &Session, text: String) -> Result<JoinHandle<ChatMessage>, Rejection> {
        let payload = Self::begin(session, text)?;
        let service = self.clone();
        let session = session.clone();
        Ok(tokio::spawn(async move { service.settle(&session, payload).await }))
    }

    fn begin(session: &Session, text: String) -> Result<Vec<WireMessage>, Rejection> {
        match session.apply(ChatAction::Submit(text)) {
            Effect::Complete(payload) => Ok(payload),
            Effect::Rejected(reason) => {
                tracing::debug!(session_id = %session.id(), reason = ?reason, "Submit rejected");
                Err(reason)
            }
            Effect::None => Err(Rejection::Busy),
        }
    }

    async fn settle(&self, session: &Session, payload: Vec<WireMessage>) -> ChatMessage {
        let request_id = Uuid::new_v4().to_string();
        tracing::info!(
            session_id = %session.id(),
            request_id = %request_id,
            message_count = payload.len(),
            "Requesting completion"
        );

        let outcome = self.call(session, payload).await;

        let (action, message) = match outcome {
            Ok(reply) => {
                tracing::info!(
                    name: "chat.completion.succeeded",
                    session_id = %session.id(),
                    request_id = %request_id,
                    reply_length = reply.len(),
                    "Completion received"
                );
                let message = ChatMessage::assistant(reply.clone());
                (ChatAction::CompletionSucceeded(reply), message)
            }
            Err(e) => {
                tracing::error!(
                    name: "chat.completion.failed",
                    session_id = %session.id(),
                    request_id = %request_id,
                    error = %e,
                    "Completion failed, answering with fallback"
                );
                (ChatAction::CompletionFailed, ChatMessage::assistant(FALLBACK_MESSAGE))
            }
        };

        session.apply(action);
        message
    }

    async fn call(&self, session: &Session, payload: Vec<WireMessage>) -> Result<String, CompletionError> {
        let token = session.cancellation_token();
        tokio::select! {
            () = token.cancelled() => Err(CompletionError::Cancelled),
            res = tokio::time::timeout(self.timeout, self.driver.complete(payload)) => {
                res.unwrap_or(Err(CompletionError::Timeout(self.timeout)))
            }
        }
    }
}
