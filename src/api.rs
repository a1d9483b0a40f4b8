//! JSON API.
//!
//! Mirrors what the widget and the contact form do in the page, for
//! scripted clients and tests.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::AppState;
use crate::chat::{ChatMessage, Rejection};
use crate::contact::{ContactForm, ContactFormState, FieldErrors};

/// Errors returned by the JSON endpoints as `{"error": ...}` bodies.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("session {0} not found")]
    SessionNotFound(String),

    #[error("message must not be empty")]
    BlankMessage,

    #[error("a reply is still being generated for this session")]
    Busy,

    #[error("contact form has {} invalid field(s)", .0.len())]
    Validation(FieldErrors),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::SessionNotFound(_) => StatusCode::NOT_FOUND,
            Self::BlankMessage => StatusCode::BAD_REQUEST,
            Self::Busy => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl From<Rejection> for ApiError {
    fn from(reason: Rejection) -> Self {
        match reason {
            Rejection::Blank => Self::BlankMessage,
            Rejection::Busy => Self::Busy,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Validation(errors) => json!({ "error": self.to_string(), "errors": errors }),
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

/// Request body for chat API.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// User message content.
    pub message: String,
    /// Optional session ID (creates new if not provided).
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Response from chat API.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Session the message was recorded in.
    pub session_id: String,
    /// Assistant reply, or the fallback text.
    pub reply: String,
    /// Full transcript after the reply.
    pub messages: Vec<ChatMessage>,
}

/// POST /api/chat - Send a message and wait for the reply.
pub async fn api_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if req.message.trim().is_empty() {
        return Err(ApiError::BlankMessage);
    }

    let session = match req.session_id.as_deref().filter(|id| !id.is_empty()) {
        Some(id) => state
            .sessions
            .get(id)
            .ok_or_else(|| ApiError::SessionNotFound(id.to_string()))?,
        None => state.sessions.create(),
    };

    tracing::info!(
        session_id = %session.id(),
        message_length = req.message.len(),
        "Received chat request"
    );

    let reply = state.chat.submit(&session, req.message).await?;

    Ok(Json(ChatResponse {
        session_id: session.id().to_string(),
        reply: reply.text,
        messages: session.messages(),
    }))
}

/// GET /api/sessions/:id/messages - Get session messages.
pub async fn api_get_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    let session = state
        .sessions
        .get(&id)
        .ok_or(ApiError::SessionNotFound(id))?;
    Ok(Json(session.messages()))
}

/// DELETE /api/sessions/:id - Drop a session and cancel its pending reply.
pub async fn api_delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    match state.sessions.remove(&id) {
        Some(_) => {
            tracing::info!(name: "session.deleted", session_id = %id, "Session deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(ApiError::SessionNotFound(id)),
    }
}

/// POST /api/contact - Validate a contact submission.
pub async fn api_contact(Json(form): Json<ContactForm>) -> Result<Json<serde_json::Value>, ApiError> {
    let mut state = ContactFormState::with_form(form);
    if state.submit() {
        Ok(Json(json!({ "submitted": true })))
    } else {
        Err(ApiError::Validation(state.errors))
    }
}
