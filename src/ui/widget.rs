//! Support chat widget markup.

use std::fmt::Write;

use super::escape;
use crate::chat::{ChatRole, ChatState};

/// How often the loading widget re-fetches itself.
const POLL_INTERVAL: &str = "1s";

const SEND_ICON: &str = r#"<svg class="icon" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2"><line x1="22" y1="2" x2="11" y2="13"/><polygon points="22 2 15 22 11 13 2 9 22 2"/></svg>"#;
const CHAT_ICON: &str = r#"<svg class="icon" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2"><path d="M21 15a2 2 0 0 1-2 2H7l-4 4V5a2 2 0 0 1 2-2h14a2 2 0 0 1 2 2z"/></svg>"#;
const CLOSE_ICON: &str = r#"<svg class="icon" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2"><line x1="18" y1="6" x2="6" y2="18"/><line x1="6" y1="6" x2="18" y2="18"/></svg>"#;
const SPINNER: &str = r#"<span class="spinner" aria-hidden="true"></span>"#;

/// Render the widget for `session_id` in `state`.
///
/// The root element swaps itself (`outerHTML`) on every interaction. While
/// a request is in flight it polls `GET /chat/{id}` until the reply lands.
#[must_use]
pub fn render_chat_widget(session_id: &str, state: &ChatState) -> String {
    let id = escape(session_id);
    let mut html = String::new();

    let poll = if state.loading {
        format!(r#" hx-get="/chat/{id}" hx-trigger="every {POLL_INTERVAL}""#)
    } else {
        String::new()
    };
    let _ = write!(
        html,
        r#"<div id="chat-widget" class="chat-widget{open}" data-session-id="{id}" hx-target="this" hx-swap="outerHTML"{poll}>"#,
        open = if state.open { " chat-widget--open" } else { "" },
    );

    if state.open {
        render_panel(&mut html, &id, state);
    } else {
        let _ = write!(
            html,
            r#"<button type="button" class="chat-launcher" hx-post="/chat/{id}/open" aria-label="Open chat">{CHAT_ICON}</button>"#
        );
    }

    html.push_str("</div>");
    html
}

fn render_panel(html: &mut String, id: &str, state: &ChatState) {
    let _ = write!(
        html,
        r#"<section class="chat-panel" aria-label="SoftSell Support">
<header class="chat-panel__header"><h4>SoftSell Support</h4><button type="button" class="chat-panel__close" hx-post="/chat/{id}/close" aria-label="Close chat">{CLOSE_ICON}</button></header>
<div id="chat-transcript" class="chat-transcript" data-autoscroll aria-live="polite">"#
    );

    for message in &state.transcript {
        let side = match message.role {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        };
        let _ = write!(
            html,
            r#"<div class="chat-row chat-row--{side}"><div class="chat-bubble chat-bubble--{side}">{}</div></div>"#,
            escape(&message.text)
        );
    }

    if state.loading {
        let _ = write!(
            html,
            r#"<div class="chat-row chat-row--assistant"><div class="chat-bubble chat-bubble--assistant chat-bubble--thinking">{SPINNER}<span>Thinking...</span></div></div>"#
        );
    }

    let disabled = if state.loading { " disabled" } else { "" };
    let button = if state.loading { SPINNER } else { SEND_ICON };
    let _ = write!(
        html,
        r#"</div>
<form class="chat-form" hx-post="/chat/{id}/messages">
<input type="text" name="message" class="chat-form__input" value="{value}" placeholder="Ask us anything..." autocomplete="off"{disabled}>
<button type="submit" class="chat-form__send" aria-label="Send message"{disabled}>{button}</button>
</form>
</section>"#,
        value = escape(&state.input),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{ChatAction, WELCOME_MESSAGE};

    fn open_state() -> ChatState {
        let mut state = ChatState::new();
        state.apply(ChatAction::Open);
        state
    }

    #[test]
    fn test_closed_widget_shows_only_launcher() {
        let html = render_chat_widget("abc", &ChatState::new());
        assert!(html.contains(r#"hx-post="/chat/abc/open""#));
        assert!(!html.contains("chat-transcript"));
        assert!(!html.contains("hx-trigger"));
    }

    #[test]
    fn test_open_widget_renders_bubbles_by_role() {
        let mut state = open_state();
        state.apply(ChatAction::Submit("Do you buy CRM seats?".to_string()));
        state.apply(ChatAction::CompletionSucceeded("Yes.".to_string()));

        let html = render_chat_widget("abc", &state);
        assert!(html.contains(WELCOME_MESSAGE));
        assert!(html.contains(
            r#"<div class="chat-bubble chat-bubble--user">Do you buy CRM seats?</div>"#
        ));
        assert!(html.contains(r#"<div class="chat-bubble chat-bubble--assistant">Yes.</div>"#));
        assert!(!html.contains("Thinking..."));
        assert!(!html.contains(" disabled"));
    }

    #[test]
    fn test_loading_widget_shows_thinking_and_polls() {
        let mut state = open_state();
        state.apply(ChatAction::Submit("hello".to_string()));

        let html = render_chat_widget("abc", &state);
        assert!(html.contains("Thinking..."));
        assert!(html.contains(r#"hx-get="/chat/abc" hx-trigger="every 1s""#));
        assert!(html.contains(" disabled"));
        // The thinking bubble is not part of the data.
        assert_eq!(state.transcript.len(), 2);
    }

    #[test]
    fn test_message_text_is_escaped() {
        let mut state = open_state();
        state.apply(ChatAction::Submit("<img src=x onerror=alert(1)>".to_string()));

        let html = render_chat_widget("abc", &state);
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
    }

    #[test]
    fn test_render_is_pure() {
        let state = open_state();
        assert_eq!(
            render_chat_widget("abc", &state),
            render_chat_widget("abc", &state)
        );
    }
}
