//! Integration tests for the intake WebSocket protocol.
//!
//! Each test spins up an Axum server on a random port, connects via
//! tokio-tungstenite, and drives a session over the real WS contract.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::time::timeout;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use intake_assist::channels::intake_routes;
use intake_assist::error::LlmError;
use intake_assist::intake::generator::{GeneratorConfig, ReplyGenerator};
use intake_assist::llm::{CompletionRequest, CompletionResponse, LlmProvider};
use intake_assist::store::{LeadStore, LibSqlBackend};

/// Maximum time any single receive is allowed to take.
const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Stub LLM provider (no real API calls).
struct StubLlm;

#[async_trait]
impl LlmProvider for StubLlm {
    fn model_name(&self) -> &str {
        "stub"
    }
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Ok(CompletionResponse {
            content: "respuesta generada".to_string(),
        })
    }
}

/// Stub provider that always fails, to exercise the canned-reply path.
struct DownLlm;

#[async_trait]
impl LlmProvider for DownLlm {
    fn model_name(&self) -> &str {
        "down"
    }
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Err(LlmError::RequestFailed {
            provider: "down".to_string(),
            reason: "connection refused".to_string(),
        })
    }
}

/// Start a server on a random port, return (port, store).
async fn start_server(llm: Arc<dyn LlmProvider>) -> (u16, Arc<dyn LeadStore>) {
    let store: Arc<dyn LeadStore> = Arc::new(LibSqlBackend::new_memory().await.unwrap());
    let generator = Arc::new(ReplyGenerator::new(llm, GeneratorConfig::default()));
    let app = intake_routes(generator, Arc::clone(&store));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    (port, store)
}

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

async fn connect(port: u16) -> WsStream {
    let (ws, _) = connect_async(format!("ws://127.0.0.1:{port}/ws"))
        .await
        .expect("WS connect failed");
    ws
}

/// Receive the next text frame as JSON.
async fn recv_json(ws: &mut WsStream) -> Value {
    loop {
        let frame = timeout(RECV_TIMEOUT, ws.next())
            .await
            .expect("timed out waiting for frame")
            .expect("stream ended")
            .expect("ws error");
        if let Message::Text(text) = frame {
            return serde_json::from_str(&text).expect("invalid JSON frame");
        }
    }
}

async fn send_text(ws: &mut WsStream, text: &str) {
    let event = serde_json::json!({ "text": text });
    ws.send(Message::Text(event.to_string().into()))
        .await
        .unwrap();
}

#[tokio::test]
async fn greeting_arrives_without_inbound_message() {
    let (port, _store) = start_server(Arc::new(StubLlm)).await;
    let mut ws = connect(port).await;

    let greeting = recv_json(&mut ws).await;
    assert_eq!(greeting["type"], "message");
    assert!(!greeting["text"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn invalid_email_reprompts_without_advancing() {
    let (port, store) = start_server(Arc::new(StubLlm)).await;
    let mut ws = connect(port).await;
    recv_json(&mut ws).await; // greeting

    send_text(&mut ws, "Ana").await;
    recv_json(&mut ws).await;

    send_text(&mut ws, "not-an-email").await;
    let reply = recv_json(&mut ws).await;
    assert_eq!(reply["type"], "message");
    assert_eq!(reply["text"], "Por favor, ingresa un email válido.");

    // Still at the email step: a valid email now advances and triggers the
    // quick-reply buttons event.
    send_text(&mut ws, "ana@x.com").await;
    let message = recv_json(&mut ws).await;
    assert_eq!(message["type"], "message");
    let buttons = recv_json(&mut ws).await;
    assert_eq!(buttons["type"], "prompt_buttons");
    assert!(buttons["buttons"]
        .as_array()
        .unwrap()
        .iter()
        .any(|b| b == "Restaurante"));

    assert!(store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn full_session_persists_one_lead() {
    let (port, store) = start_server(Arc::new(StubLlm)).await;
    let mut ws = connect(port).await;
    recv_json(&mut ws).await; // greeting

    send_text(&mut ws, "Ana").await;
    recv_json(&mut ws).await;

    send_text(&mut ws, "ana@x.com").await;
    recv_json(&mut ws).await; // message
    recv_json(&mut ws).await; // prompt_buttons

    send_text(&mut ws, "restaurante").await;
    recv_json(&mut ws).await;

    send_text(&mut ws, "necesito web").await;
    let terminal = recv_json(&mut ws).await;
    assert_eq!(terminal["type"], "message");

    let leads = store.list_all().await.unwrap();
    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0].name, "Ana");
    assert_eq!(leads[0].email, "ana@x.com");
    assert_eq!(leads[0].business_type, "restaurante");
    assert_eq!(leads[0].needs, "necesito web");
    assert!(leads[0].id > 0);

    // F: further messages get the fixed closing reply and create no records.
    send_text(&mut ws, "¿sigues ahí?").await;
    let closing = recv_json(&mut ws).await;
    assert_eq!(
        closing["text"],
        "Gracias, ya tenemos tus datos. ¡Pronto te contactaremos!"
    );
    assert_eq!(store.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn generation_outage_degrades_to_canned_replies() {
    let (port, store) = start_server(Arc::new(DownLlm)).await;
    let mut ws = connect(port).await;

    let greeting = recv_json(&mut ws).await;
    assert_eq!(
        greeting["text"],
        "¡Hola! Soy tu asistente digital. ¿Cuál es tu nombre?"
    );

    send_text(&mut ws, "Ana").await;
    let reply = recv_json(&mut ws).await;
    assert!(reply["text"].as_str().unwrap().contains("Ana"));

    send_text(&mut ws, "ana@x.com").await;
    recv_json(&mut ws).await;
    recv_json(&mut ws).await; // prompt_buttons

    send_text(&mut ws, "tienda").await;
    recv_json(&mut ws).await;

    send_text(&mut ws, "").await;
    let terminal = recv_json(&mut ws).await;
    // Canned terminal reply falls back to the recommendation table.
    assert!(terminal["text"]
        .as_str()
        .unwrap()
        .contains("Tienda online con e-commerce"));

    // The outage never blocked progression or persistence.
    let leads = store.list_all().await.unwrap();
    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0].needs, "no especificado");
}

#[tokio::test]
async fn sessions_are_isolated() {
    let (port, store) = start_server(Arc::new(StubLlm)).await;

    let mut ws_a = connect(port).await;
    let mut ws_b = connect(port).await;
    recv_json(&mut ws_a).await;
    recv_json(&mut ws_b).await;

    // Session A progresses; session B stays on the name step.
    send_text(&mut ws_a, "Ana").await;
    recv_json(&mut ws_a).await;
    send_text(&mut ws_a, "ana@x.com").await;
    recv_json(&mut ws_a).await;
    recv_json(&mut ws_a).await;

    // B's first message is still treated as the name.
    send_text(&mut ws_b, "not-an-email").await;
    let reply = recv_json(&mut ws_b).await;
    assert_ne!(reply["text"], "Por favor, ingresa un email válido.");

    assert!(store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_frames_are_ignored() {
    let (port, _store) = start_server(Arc::new(StubLlm)).await;
    let mut ws = connect(port).await;
    recv_json(&mut ws).await; // greeting

    // Not the inbound shape — the session skips it and keeps going.
    ws.send(Message::Text("not json".to_string().into()))
        .await
        .unwrap();
    send_text(&mut ws, "Ana").await;
    let reply = recv_json(&mut ws).await;
    assert_eq!(reply["type"], "message");
}

#[tokio::test]
async fn disconnect_before_completion_loses_session() {
    let (port, store) = start_server(Arc::new(StubLlm)).await;
    {
        let mut ws = connect(port).await;
        recv_json(&mut ws).await;
        send_text(&mut ws, "Ana").await;
        recv_json(&mut ws).await;
        ws.close(None).await.unwrap();
    }
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(store.list_all().await.unwrap().is_empty());

    // A new connection starts from a fresh state machine.
    let mut ws = connect(port).await;
    let greeting = recv_json(&mut ws).await;
    assert_eq!(greeting["type"], "message");
}
