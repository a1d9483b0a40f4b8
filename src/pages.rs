//! Full page and HTMX fragment endpoints.
//!
//! Every fragment handler answers with the element that issued the request;
//! the markup carries `hx-swap="outerHTML"` on its root.

use axum::{
    Form,
    extract::{Path, State},
    response::Html,
};
use chrono::{Datelike, Utc};
use serde::Deserialize;

use crate::AppState;
use crate::api::ApiError;
use crate::chat::{ChatAction, Rejection};
use crate::contact::{ContactForm, ContactFormState};
use crate::session::Session;
use crate::ui::{contact_form::render_contact_section, page::render_index, widget::render_chat_widget};

/// Form body of the widget's send form.
#[derive(Debug, Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub message: String,
}

/// GET / - Render the page with a freshly minted chat session.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let session = state.sessions.create();
    tracing::debug!(session_id = %session.id(), "Session created for page view");

    let widget = render_chat_widget(session.id(), &session.snapshot());
    let contact = render_contact_section(
        &ContactFormState::default(),
        state.config.contact.confirmation(),
    );
    Html(render_index(&widget, &contact, Utc::now().year()))
}

/// GET /healthz
pub async fn healthz() -> &'static str {
    "ok"
}

fn find_session(state: &AppState, id: String) -> Result<Session, ApiError> {
    state.sessions.get(&id).ok_or(ApiError::SessionNotFound(id))
}

fn widget(session: &Session) -> Html<String> {
    Html(render_chat_widget(session.id(), &session.snapshot()))
}

/// GET /chat/:id - Current widget fragment.
pub async fn chat_widget(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let session = find_session(&state, id)?;
    Ok(widget(&session))
}

/// POST /chat/:id/open
pub async fn chat_open(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let session = find_session(&state, id)?;
    session.apply(ChatAction::Open);
    Ok(widget(&session))
}

/// POST /chat/:id/close
pub async fn chat_close(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let session = find_session(&state, id)?;
    session.apply(ChatAction::Close);
    Ok(widget(&session))
}

/// POST /chat/:id/messages - Record the message and answer in the background.
///
/// The returned fragment shows the thinking bubble and polls until the
/// reply is in. A blank message leaves the widget as it was; a message sent
/// while busy is kept in the input box.
pub async fn chat_send(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<ChatForm>,
) -> Result<Html<String>, ApiError> {
    let session = find_session(&state, id)?;
    match state.chat.submit_detached(&session, form.message.clone()) {
        Ok(()) | Err(Rejection::Blank) => {}
        Err(Rejection::Busy) => {
            session.apply(ChatAction::SetInput(form.message));
        }
    }
    Ok(widget(&session))
}

/// GET /contact - A fresh, empty contact section.
pub async fn contact_section(State(state): State<AppState>) -> Html<String> {
    Html(render_contact_section(
        &ContactFormState::default(),
        state.config.contact.confirmation(),
    ))
}

/// POST /contact - Validate and either show the errors or the confirmation.
pub async fn contact_submit(
    State(state): State<AppState>,
    Form(form): Form<ContactForm>,
) -> Html<String> {
    let mut contact = ContactFormState::with_form(form);
    contact.submit();
    Html(render_contact_section(
        &contact,
        state.config.contact.confirmation(),
    ))
}
