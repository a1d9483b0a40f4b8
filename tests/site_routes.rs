use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};
use softsell_site::AppState;
use softsell_site::api::ChatResponse;
use softsell_site::chat::{ChatRole, FALLBACK_MESSAGE, WELCOME_MESSAGE};
use softsell_site::config::AppConfig;
use softsell_site::llm::{CompletionDriver, CompletionError, WireMessage};
use softsell_site::server::build_router;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Answers every request with the same text, or fails with a status.
struct FixedDriver(Result<&'static str, u16>);

#[async_trait::async_trait]
impl CompletionDriver for FixedDriver {
    async fn complete(&self, _messages: Vec<WireMessage>) -> Result<String, CompletionError> {
        match self.0 {
            Ok(text) => Ok(text.to_string()),
            Err(status) => Err(CompletionError::Status {
                status,
                body: "upstream exploded".to_string(),
            }),
        }
    }
}

/// Holds every request until the gate is opened.
struct GatedDriver(Arc<Notify>);

#[async_trait::async_trait]
impl CompletionDriver for GatedDriver {
    async fn complete(&self, _messages: Vec<WireMessage>) -> Result<String, CompletionError> {
        self.0.notified().await;
        Ok("Thanks for waiting.".to_string())
    }
}

fn setup(driver: Arc<dyn CompletionDriver>) -> (TestServer, AppState) {
    let state = AppState::new(Arc::new(AppConfig::default()), driver);
    let server = TestServer::new(build_router(state.clone())).unwrap();
    (server, state)
}

fn session_id_from(html: &str) -> String {
    let marker = r#"data-session-id=""#;
    let start = html.find(marker).expect("widget carries its session id") + marker.len();
    let end = start + html[start..].find('"').unwrap();
    html[start..end].to_string()
}

async fn open_session(server: &TestServer) -> String {
    let page = server.get("/").await;
    page.assert_status_ok();
    session_id_from(&page.text())
}

async fn wait_until_idle(server: &TestServer, id: &str) -> String {
    for _ in 0..100 {
        let html = server.get(&format!("/chat/{id}")).await.text();
        if !html.contains("Thinking...") {
            return html;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("widget never left the loading state");
}

#[tokio::test]
async fn test_index_renders_page_and_mints_session() {
    let (server, state) = setup(Arc::new(FixedDriver(Ok("unused"))));

    let page = server.get("/").await;
    page.assert_status_ok();
    let html = page.text();

    assert!(html.contains("<title>SoftSell | Turn Unused Software Licenses Into Cash</title>"));
    assert!(html.contains(r#"id="how-it-works""#));
    assert!(html.contains(r#"id="contact""#));
    assert!(html.contains("$4.2M+"));
    assert_eq!(html.matches(r#"id="chat-widget""#).count(), 1);

    let id = session_id_from(&html);
    assert!(state.sessions.get(&id).is_some());

    server.get("/").await;
    assert_eq!(state.sessions.len(), 2);
}

#[tokio::test]
async fn test_healthz() {
    let (server, _) = setup(Arc::new(FixedDriver(Ok("unused"))));
    let res = server.get("/healthz").await;
    res.assert_status_ok();
    assert_eq!(res.text(), "ok");
}

#[tokio::test]
async fn test_open_and_close_widget() {
    let (server, _) = setup(Arc::new(FixedDriver(Ok("unused"))));
    let id = open_session(&server).await;

    let opened = server.post(&format!("/chat/{id}/open")).await.text();
    assert!(opened.contains(WELCOME_MESSAGE));
    assert!(opened.contains(r#"placeholder="Ask us anything...""#));

    let closed = server.post(&format!("/chat/{id}/close")).await.text();
    assert!(!closed.contains("chat-transcript"));
    assert!(closed.contains(r#"aria-label="Open chat""#));
}

#[tokio::test]
async fn test_widget_for_unknown_session_is_404() {
    let (server, _) = setup(Arc::new(FixedDriver(Ok("unused"))));
    server
        .get("/chat/not-a-session")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_html_send_shows_thinking_then_reply() {
    let gate = Arc::new(Notify::new());
    let (server, state) = setup(Arc::new(GatedDriver(gate.clone())));
    let id = open_session(&server).await;
    server.post(&format!("/chat/{id}/open")).await;

    let pending = server
        .post(&format!("/chat/{id}/messages"))
        .form(&json!({ "message": "Do you buy Adobe licenses?" }))
        .await
        .text();
    assert!(pending.contains("Do you buy Adobe licenses?"));
    assert!(pending.contains("Thinking..."));
    assert!(pending.contains(&format!(r#"hx-get="/chat/{id}""#)));
    assert!(state.sessions.get(&id).unwrap().is_loading());

    gate.notify_one();
    let settled = wait_until_idle(&server, &id).await;
    assert!(settled.contains("Thanks for waiting."));
    assert!(!settled.contains("hx-trigger"));
}

#[tokio::test]
async fn test_html_send_blank_changes_nothing() {
    let (server, state) = setup(Arc::new(FixedDriver(Ok("unused"))));
    let id = open_session(&server).await;

    server
        .post(&format!("/chat/{id}/messages"))
        .form(&json!({ "message": "   " }))
        .await
        .assert_status_ok();

    let session = state.sessions.get(&id).unwrap();
    assert_eq!(session.message_count(), 1);
    assert!(!session.is_loading());
}

#[tokio::test]
async fn test_html_send_failure_shows_fallback() {
    let (server, _) = setup(Arc::new(FixedDriver(Err(500))));
    let id = open_session(&server).await;
    server.post(&format!("/chat/{id}/open")).await;

    server
        .post(&format!("/chat/{id}/messages"))
        .form(&json!({ "message": "hello" }))
        .await;

    let html = wait_until_idle(&server, &id).await;
    assert_eq!(html.matches("trouble connecting").count(), 1);
}

#[tokio::test]
async fn test_api_chat_end_to_end() {
    let (server, _) = setup(Arc::new(FixedDriver(Ok(
        "We support bank transfer, PayPal, and cryptocurrency.",
    ))));

    let res = server
        .post("/api/chat")
        .json(&json!({ "message": "What payment methods do you support?" }))
        .await;
    res.assert_status_ok();
    let body: ChatResponse = res.json();

    assert_eq!(body.reply, "We support bank transfer, PayPal, and cryptocurrency.");
    let roles: Vec<ChatRole> = body.messages.iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![ChatRole::Assistant, ChatRole::User, ChatRole::Assistant]);
    assert_eq!(body.messages[1].text, "What payment methods do you support?");

    let transcript: Value = server
        .get(&format!("/api/sessions/{}/messages", body.session_id))
        .await
        .json();
    assert_eq!(transcript.as_array().unwrap().len(), 3);
    assert_eq!(transcript[2]["role"], "assistant");
}

#[tokio::test]
async fn test_api_chat_upstream_failure_returns_fallback() {
    let (server, _) = setup(Arc::new(FixedDriver(Err(503))));

    let body: ChatResponse = server
        .post("/api/chat")
        .json(&json!({ "message": "hello" }))
        .await
        .json();

    assert_eq!(body.reply, FALLBACK_MESSAGE);
    assert_eq!(body.messages.len(), 3);
}

#[tokio::test]
async fn test_api_chat_blank_is_400() {
    let (server, state) = setup(Arc::new(FixedDriver(Ok("unused"))));

    let res = server
        .post("/api/chat")
        .json(&json!({ "message": "  \n" }))
        .await;
    res.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = res.json();
    assert_eq!(body["error"], "message must not be empty");
    assert!(state.sessions.is_empty());
}

#[tokio::test]
async fn test_api_chat_while_busy_is_409() {
    let gate = Arc::new(Notify::new());
    let (server, state) = setup(Arc::new(GatedDriver(gate.clone())));
    let id = open_session(&server).await;

    server
        .post(&format!("/chat/{id}/messages"))
        .form(&json!({ "message": "first" }))
        .await;
    let before = state.sessions.get(&id).unwrap().messages();

    server
        .post("/api/chat")
        .json(&json!({ "message": "second", "session_id": id }))
        .await
        .assert_status(StatusCode::CONFLICT);
    assert_eq!(state.sessions.get(&id).unwrap().messages(), before);

    gate.notify_one();
    wait_until_idle(&server, &id).await;
}

#[tokio::test]
async fn test_api_chat_unknown_session_is_404() {
    let (server, _) = setup(Arc::new(FixedDriver(Ok("unused"))));
    server
        .post("/api/chat")
        .json(&json!({ "message": "hi", "session_id": "missing" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_session() {
    let (server, state) = setup(Arc::new(FixedDriver(Ok("unused"))));
    let id = open_session(&server).await;

    server
        .delete(&format!("/api/sessions/{id}"))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    assert!(state.sessions.get(&id).is_none());

    server
        .get(&format!("/api/sessions/{id}/messages"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .delete(&format!("/api/sessions/{id}"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_api_contact_reports_field_errors() {
    let (server, _) = setup(Arc::new(FixedDriver(Ok("unused"))));

    let res = server
        .post("/api/contact")
        .json(&json!({
            "name": "Michael Chang",
            "email": "abc",
            "company": "Databridge Solutions",
            "licenseType": "crm",
            "message": "Forty spare seats."
        }))
        .await;
    res.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json();
    assert_eq!(body["errors"], json!({ "email": "Please enter a valid email" }));
}

#[tokio::test]
async fn test_api_contact_accepts_valid_form() {
    let (server, _) = setup(Arc::new(FixedDriver(Ok("unused"))));

    let res = server
        .post("/api/contact")
        .json(&json!({
            "name": "Emma Rodriguez",
            "email": "emma@vertex.io",
            "company": "Vertex Systems",
            "licenseType": "enterprise",
            "message": "We have unused ERP seats."
        }))
        .await;
    res.assert_status_ok();
    assert_eq!(res.json::<Value>(), json!({ "submitted": true }));
}

#[tokio::test]
async fn test_contact_fragment_flow() {
    let (server, _) = setup(Arc::new(FixedDriver(Ok("unused"))));

    let invalid = server
        .post("/contact")
        .form(&json!({ "name": "Sarah", "email": "" }))
        .await
        .text();
    assert!(invalid.contains("Email is required"));
    assert!(invalid.contains("Company is required"));
    assert!(invalid.contains(r#"value="Sarah""#));

    let accepted = server
        .post("/contact")
        .form(&json!({
            "name": "Sarah Johnson",
            "email": "sarah@techflow.io",
            "company": "TechFlow Inc.",
            "licenseType": "design",
            "message": "Spare design seats."
        }))
        .await
        .text();
    assert!(accepted.contains("Message sent successfully!"));
    assert!(!accepted.contains(r#"value="Sarah Johnson""#));

    let fresh = server.get("/contact").await.text();
    assert!(!fresh.contains("Message sent successfully!"));
    assert!(fresh.contains(r#"hx-post="/contact""#));
}
