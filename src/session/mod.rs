//! Chat session management.
//!
//! This module provides in-memory session storage for the support chat.
//! Every page render mints a session; it holds the widget state until it
//! is deleted or sits idle past its TTL. Nothing is persisted.
//!
//! # Architecture
//!
//! - [`Session`]: one widget's [`ChatState`](crate::chat::ChatState) plus a
//!   cancellation token for its in-flight request
//! - [`SessionStore`]: Thread-safe store for all active sessions
//!
//! # Example
//!
//! ```rust
//! use softsell_site::chat::ChatAction;
//! use softsell_site::session::SessionStore;
//!
//! let store = SessionStore::new();
//! let session = store.create();
//! session.apply(ChatAction::Submit("Hello!".into()));
//!
//! let messages = session.messages();
//! assert_eq!(messages.len(), 2);
//! ```

mod thread;

pub use thread::{DEFAULT_SESSION_TIMEOUT, Session, SessionStore};
