//! WebSocket server for the intake conversation.
//!
//! Each connection gets a fresh `ConversationMachine`; the greeting is sent
//! immediately on upgrade, then the handler loops over inbound frames. The
//! sequential recv loop guarantees no interleaving of two messages within
//! the same session, while different sessions run on independent tasks.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::intake::{ConversationMachine, ReplyGenerator, TurnReply};
use crate::store::LeadStore;

// ── JSON Protocol ───────────────────────────────────────────────────────

/// Inbound event: one user turn.
#[derive(Debug, Deserialize)]
struct ClientEvent {
    text: String,
}

/// Outbound events.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
enum ServerEvent {
    /// The primary reply for a turn.
    #[serde(rename = "message")]
    Message { text: String },
    /// Advisory quick-reply choices.
    #[serde(rename = "prompt_buttons")]
    PromptButtons { buttons: Vec<String> },
}

// ── Routes ──────────────────────────────────────────────────────────────

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<ReplyGenerator>,
    pub store: Arc<dyn LeadStore>,
}

/// Build the Axum router with the intake WebSocket and health routes.
pub fn intake_routes(generator: Arc<ReplyGenerator>, store: Arc<dyn LeadStore>) -> Router {
    let state = AppState { generator, store };

    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
        .layer(cors_layer())
        .with_state(state)
}

/// CORS policy for the browser chat widget.
fn cors_layer() -> CorsLayer {
    let origins: [axum::http::HeaderValue; 3] = [
        "http://127.0.0.1:5500",
        "http://localhost:5500",
        "http://127.0.0.1:5000",
    ]
    .map(|o| o.parse().expect("static origin"));
    CorsLayer::new().allow_origin(origins)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "intake-assist"
    }))
}

// ── WebSocket ───────────────────────────────────────────────────────────

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let session_id = Uuid::new_v4();
    info!(session_id = %session_id, "Session connected");

    let mut machine = ConversationMachine::new(state.generator, state.store);

    // Greeting goes out unconditionally, before any inbound message.
    let greeting = machine.greeting().await;
    if send_reply(&mut socket, &greeting).await.is_err() {
        warn!(session_id = %session_id, "Client disconnected before greeting");
        return;
    }

    loop {
        match socket.recv().await {
            Some(Ok(Message::Text(text))) => {
                let event = match serde_json::from_str::<ClientEvent>(&text) {
                    Ok(event) => event,
                    Err(e) => {
                        debug!(session_id = %session_id, error = %e, "Unrecognized WS message");
                        continue;
                    }
                };

                let reply = machine.handle_message(&event.text).await;
                debug!(
                    session_id = %session_id,
                    step = %machine.step(),
                    "Turn processed"
                );
                if send_reply(&mut socket, &reply).await.is_err() {
                    debug!(session_id = %session_id, "Client disconnected during send");
                    break;
                }
            }
            Some(Ok(Message::Ping(data))) => {
                if socket.send(Message::Pong(data)).await.is_err() {
                    break;
                }
            }
            Some(Ok(Message::Close(_))) | None => {
                break;
            }
            Some(Err(e)) => {
                warn!(session_id = %session_id, error = %e, "WebSocket error");
                break;
            }
            _ => {}
        }
    }

    // Session state dies with the connection; an incomplete intake is lost.
    info!(session_id = %session_id, step = %machine.step(), "Session closed");
}

/// Send a turn's events: the message, then optional prompt buttons.
async fn send_reply(socket: &mut WebSocket, reply: &TurnReply) -> Result<(), axum::Error> {
    let message = ServerEvent::Message {
        text: reply.text.clone(),
    };
    send_event(socket, &message).await?;

    if let Some(buttons) = &reply.buttons {
        let event = ServerEvent::PromptButtons {
            buttons: buttons.clone(),
        };
        send_event(socket, &event).await?;
    }
    Ok(())
}

async fn send_event(socket: &mut WebSocket, event: &ServerEvent) -> Result<(), axum::Error> {
    let json = serde_json::to_string(event)
        .map_err(|e| axum::Error::new(std::io::Error::other(e.to_string())))?;
    socket.send(Message::Text(json.into())).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_event_parses_inbound_shape() {
        let event: ClientEvent = serde_json::from_str(r#"{"text":"Ana"}"#).unwrap();
        assert_eq!(event.text, "Ana");
    }

    #[test]
    fn server_events_are_tagged() {
        let message = ServerEvent::Message {
            text: "hola".to_string(),
        };
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["type"], "message");
        assert_eq!(json["text"], "hola");

        let buttons = ServerEvent::PromptButtons {
            buttons: vec!["Restaurante".to_string()],
        };
        let json = serde_json::to_value(&buttons).unwrap();
        assert_eq!(json["type"], "prompt_buttons");
        assert_eq!(json["buttons"][0], "Restaurante");
    }
}
