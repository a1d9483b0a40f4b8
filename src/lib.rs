//! SoftSell marketing site
//!
//! A server-rendered, single-page site for selling unused software licenses,
//! with a contact form and a support chat widget answered by an
//! `OpenAI`-compatible completion service.
//!
//! # Architecture
//!
//! - **Server**: Axum router serving the page, HTMX fragments and a JSON API
//! - **Chat**: reducer-style widget state plus a service that proxies to the
//!   completion endpoint with a timeout and per-session cancellation
//! - **Contact**: synchronous form validation, logged and never transmitted
//! - **UI**: pure functions from state to HTML
//!
//! # Modules
//!
//! - [`api`]: JSON endpoints and their error type
//! - [`chat`]: widget reducer, prompt and completion service
//! - [`config`]: layered configuration
//! - [`contact`]: contact form model and validation
//! - [`llm`]: completion driver traits and implementations
//! - [`pages`]: full page and HTMX fragment endpoints
//! - [`session`]: per-visitor chat sessions
//! - [`ui`]: HTML rendering

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::unused_async)]

pub mod api;
pub mod chat;
pub mod config;
pub mod contact;
pub mod llm;
pub mod pages;
pub mod server;
pub mod session;
pub mod ui;

use std::sync::Arc;

use crate::chat::ChatService;
use crate::config::AppConfig;
use crate::llm::CompletionDriver;
use crate::session::SessionStore;

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Session store for chat widgets.
    pub sessions: SessionStore,
    /// Completion proxy.
    pub chat: ChatService,
    /// Global Configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wire a fresh session store and chat service around `driver`.
    pub fn new(config: Arc<AppConfig>, driver: Arc<dyn CompletionDriver>) -> Self {
        let chat = ChatService::new(driver, config.chat.request_timeout());
        Self {
            sessions: SessionStore::new(),
            chat,
            config,
        }
    }
}
