//! Chat session and session storage.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::chat::{ChatAction, ChatMessage, ChatState, Effect};

/// Default session timeout (30 minutes).
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// A single chat session: one page load's worth of widget state.
///
/// Cloning is cheap; clones share the same state.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    /// Unique session identifier.
    id: String,
    /// Widget state. Never held across an await.
    state: Mutex<ChatState>,
    /// Last activity time.
    last_activity: RwLock<DateTime<Utc>>,
    /// Cancelled when the session goes away.
    cancel: CancellationToken,
}

impl Session {
    /// Create a new session with the given ID.
    fn new(id: String) -> Self {
        let now = Utc::now();
        Self {
            inner: Arc::new(SessionInner {
                id,
                state: Mutex::new(ChatState::new()),
                last_activity: RwLock::new(now),
                cancel: CancellationToken::new(),
            }),
        }
    }

    /// Get the session ID.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Run an action through the reducer.
    pub fn apply(&self, action: ChatAction) -> Effect {
        let effect = self
            .inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .apply(action);
        self.touch();
        effect
    }

    /// Copy of the current widget state.
    #[must_use]
    pub fn snapshot(&self) -> ChatState {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Get all messages in the transcript.
    #[must_use]
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.snapshot().transcript
    }

    /// Newest transcript entry.
    #[must_use]
    pub fn last_message(&self) -> Option<ChatMessage> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .transcript
            .last()
            .cloned()
    }

    /// Get the number of messages in the transcript.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .transcript
            .len()
    }

    /// Whether a completion is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .loading
    }

    /// Token that fires when the session is removed or the server stops.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.inner.cancel.clone()
    }

    /// Abort any in-flight completion for this session.
    pub fn cancel(&self) {
        self.inner.cancel.cancel();
    }

    /// Update the last activity timestamp.
    fn touch(&self) {
        let mut guard = self
            .inner
            .last_activity
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Utc::now();
    }

    /// Check if the session has expired with a custom timeout.
    ///
    /// A session with a request in flight never expires; the request timeout
    /// bounds how long that can last.
    #[must_use]
    pub fn is_expired_with_timeout(&self, timeout: Duration) -> bool {
        if self.is_loading() {
            return false;
        }
        let last = *self
            .inner
            .last_activity
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        // Negative duration means clock skew; treat as fresh.
        (Utc::now() - last).to_std().is_ok_and(|idle| idle > timeout)
    }
}

/// Thread-safe store for sessions.
///
/// Provides methods for creating, retrieving, and cleaning up sessions.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

#[derive(Debug)]
struct SessionStoreInner {
    sessions: RwLock<HashMap<String, Session>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Create a new session store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SessionStoreInner {
                sessions: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Create a new session and return it.
    #[must_use]
    pub fn create(&self) -> Session {
        let session = Session::new(Uuid::new_v4().to_string());
        let mut guard = self
            .inner
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        guard.insert(session.id().to_string(), session.clone());
        session
    }

    /// Get a session by ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Session> {
        let guard = self
            .inner
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        guard.get(id).cloned()
    }

    /// Remove a session by ID, cancelling its in-flight request.
    pub fn remove(&self, id: &str) -> Option<Session> {
        let removed = self
            .inner
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);
        if let Some(session) = &removed {
            session.cancel();
        }
        removed
    }

    /// Get the number of active sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if there are no sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove sessions that have been inactive longer than the timeout.
    pub fn cleanup_expired_with_timeout(&self, timeout: Duration) -> usize {
        let mut guard = self
            .inner
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = guard.len();
        guard.retain(|_, session| {
            let expired = session.is_expired_with_timeout(timeout);
            if expired {
                session.cancel();
            }
            !expired
        });
        before - guard.len()
    }

    /// Cancel every in-flight request. Used on shutdown.
    pub fn cancel_all(&self) {
        let guard = self
            .inner
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        for session in guard.values() {
            session.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{ChatRole, WELCOME_MESSAGE};

    #[test]
    fn test_session_lifecycle() {
        let session = Session::new("test-123".to_string());

        assert_eq!(session.id(), "test-123");
        assert_eq!(session.message_count(), 1);
        assert_eq!(session.messages()[0].text, WELCOME_MESSAGE);

        session.apply(ChatAction::Submit("Hello".to_string()));
        assert_eq!(session.message_count(), 2);
        assert!(session.is_loading());

        session.apply(ChatAction::CompletionSucceeded("Hi there!".to_string()));
        assert_eq!(session.message_count(), 3);
        assert!(!session.is_loading());

        let messages = session.messages();
        assert_eq!(messages[1].role, ChatRole::User);
        assert_eq!(messages[2].role, ChatRole::Assistant);
        assert_eq!(session.last_message().unwrap().text, "Hi there!");
    }

    #[test]
    fn test_session_store() {
        let store = SessionStore::new();

        assert!(store.is_empty());

        let session = store.create();
        assert_eq!(store.len(), 1);

        let retrieved = store.get(session.id()).unwrap();
        assert_eq!(retrieved.id(), session.id());

        store.remove(session.id());
        assert!(store.is_empty());
        assert!(session.cancellation_token().is_cancelled());
    }

    #[test]
    fn test_clones_share_state() {
        let store = SessionStore::new();
        let session = store.create();
        store
            .get(session.id())
            .unwrap()
            .apply(ChatAction::Open);
        assert!(session.snapshot().open);
    }

    #[test]
    fn test_cleanup_expired() {
        let store = SessionStore::new();
        let stale = store.create();
        let busy = store.create();
        busy.apply(ChatAction::Submit("still waiting".to_string()));

        assert!(!stale.is_expired_with_timeout(DEFAULT_SESSION_TIMEOUT));
        let removed = store.cleanup_expired_with_timeout(Duration::ZERO);
        std::thread::sleep(Duration::from_millis(5));
        let removed = removed + store.cleanup_expired_with_timeout(Duration::ZERO);

        assert_eq!(removed, 1);
        assert!(store.get(stale.id()).is_none());
        assert!(stale.cancellation_token().is_cancelled());
        assert!(store.get(busy.id()).is_some());
    }

    #[test]
    fn test_cancel_all() {
        let store = SessionStore::new();
        let a = store.create();
        let b = store.create();
        store.cancel_all();
        assert!(a.cancellation_token().is_cancelled());
        assert!(b.cancellation_token().is_cancelled());
        assert_eq!(store.len(), 2);
    }
}
