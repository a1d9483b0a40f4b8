use axum::{
    Router,
    extract::{DefaultBodyLimit, Request},
    http::StatusCode,
    middleware::Next,
    response::IntoResponse,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use tracing::info;

use crate::AppState;
use crate::config::AppConfig;
use crate::llm::{ChatCompletionsDriver, LlmSettings};
use crate::session::SessionStore;
use crate::{api, pages};

/// Slack on top of the completion timeout before a request is cut off.
const REQUEST_TIMEOUT_SLACK: Duration = Duration::from_secs(5);

/// Largest accepted request body.
const BODY_LIMIT: usize = 64 * 1024;

/// Build the application router for `state`.
pub fn build_router(state: AppState) -> Router {
    let timeout_duration = state.config.chat.request_timeout() + REQUEST_TIMEOUT_SLACK;
    let static_dir = ServeDir::new(&state.config.server.static_dir);

    Router::new()
        // HTML page and fragments
        .route("/", get(pages::index))
        .route("/healthz", get(pages::healthz))
        .route("/chat/{id}", get(pages::chat_widget))
        .route("/chat/{id}/open", post(pages::chat_open))
        .route("/chat/{id}/close", post(pages::chat_close))
        .route("/chat/{id}/messages", post(pages::chat_send))
        .route(
            "/contact",
            get(pages::contact_section).post(pages::contact_submit),
        )
        // JSON API
        .route("/api/chat", post(api::api_chat))
        .route("/api/sessions/{id}", axum::routing::delete(api::api_delete_session))
        .route("/api/sessions/{id}/messages", get(api::api_get_messages))
        .route("/api/contact", post(api::api_contact))
        // Static assets
        .nest_service("/static", static_dir)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(axum::middleware::from_fn(
            move |req: Request, next: Next| async move {
                match tokio::time::timeout(timeout_duration, next.run(req)).await {
                    Ok(res) => res,
                    Err(_) => (StatusCode::REQUEST_TIMEOUT, "Request timed out").into_response(),
                }
            },
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Periodically drop sessions idle for longer than `ttl`.
pub fn spawn_session_sweeper(
    sessions: SessionStore,
    ttl: Duration,
    every: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.tick().await;
        loop {
            tokio::select! {
                () = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    let removed = sessions.cleanup_expired_with_timeout(ttl);
                    if removed > 0 {
                        info!(
                            name: "session.swept",
                            removed,
                            remaining = sessions.len(),
                            "Expired chat sessions removed"
                        );
                    }
                }
            }
        }
    })
}

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>, settings: LlmSettings) -> anyhow::Result<()> {
    info!(
        name: "llm.config.loaded",
        base_url = %settings.base_url,
        model = %settings.model,
        provider = ?settings.provider,
        "LLM configuration loaded"
    );
    if settings.api_key.is_none() && settings.provider.requires_api_key() {
        tracing::warn!(
            name: "llm.config.missing_key",
            "LLM_API_KEY is not set; chat replies will fall back"
        );
    }

    let driver = Arc::new(ChatCompletionsDriver::new(settings));
    let state = AppState::new(Arc::clone(&config), driver);
    let sessions = state.sessions.clone();

    let shutdown = CancellationToken::new();
    let sweeper = spawn_session_sweeper(
        sessions.clone(),
        config.chat.session_ttl(),
        config.chat.sweep_interval(),
        shutdown.clone(),
    );

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown.cancel();
    sessions.cancel_all();
    let _ = sweeper.await;
    info!(name: "server.stopped", "Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_removes_idle_sessions() {
        let sessions = SessionStore::new();
        let _session = sessions.create();
        // Idle time is measured on the wall clock.
        std::thread::sleep(Duration::from_millis(2));
        let shutdown = CancellationToken::new();

        let handle = spawn_session_sweeper(
            sessions.clone(),
            Duration::ZERO,
            Duration::from_secs(1),
            shutdown.clone(),
        );
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(sessions.is_empty());
        shutdown.cancel();
        handle.await.unwrap();
    }
}
