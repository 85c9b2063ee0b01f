//! WebSocket change feed
//!
//! Every catalog mutation is forwarded to connected clients as an event
//! envelope. The feed covers both collections; a client that only cares
//! about one tab filters on `event.collection`. The client side of the
//! protocol is a single keepalive ping.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::SinkExt;
use futures::stream::{SplitSink, StreamExt};
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use uuid::Uuid;

use crate::core::events::{EventBus, EventEnvelope};

use super::AppState;

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Keepalive ping
    Ping,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Welcome message on connection
    Welcome { connection_id: String },
    /// A catalog mutation
    Event { data: EventEnvelope },
    /// Keepalive response
    Pong,
    /// Error message
    Error { message: String },
}

/// WebSocket upgrade handler for GET /ws
pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    let events = state.events.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, events))
}

async fn handle_socket(socket: WebSocket, events: EventBus) {
    let connection_id = format!("conn_{}", Uuid::new_v4().simple());
    let (mut sink, mut incoming) = socket.split();

    let welcome = ServerMessage::Welcome {
        connection_id: connection_id.clone(),
    };
    if send_message(&mut sink, &welcome).await.is_err() {
        return;
    }

    let mut feed = BroadcastStream::new(events.subscribe());

    loop {
        tokio::select! {
            message = incoming.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    let reply = match serde_json::from_str::<ClientMessage>(&text) {
                        Ok(ClientMessage::Ping) => ServerMessage::Pong,
                        Err(e) => ServerMessage::Error {
                            message: format!("invalid message: {}", e),
                        },
                    };
                    if send_message(&mut sink, &reply).await.is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::debug!(connection_id = %connection_id, "client disconnected");
                    break;
                }
                Some(Ok(_)) => {
                    // Ignore binary and control frames; axum answers pings itself
                }
                Some(Err(e)) => {
                    tracing::debug!(connection_id = %connection_id, error = %e, "websocket read error");
                    break;
                }
            },
            event = feed.next() => match event {
                Some(Ok(envelope)) => {
                    let message = ServerMessage::Event { data: envelope };
                    if send_message(&mut sink, &message).await.is_err() {
                        break;
                    }
                }
                Some(Err(BroadcastStreamRecvError::Lagged(count))) => {
                    let message = ServerMessage::Error {
                        message: format!("{} events dropped, resync recommended", count),
                    };
                    if send_message(&mut sink, &message).await.is_err() {
                        break;
                    }
                }
                None => break,
            },
        }
    }
}

async fn send_message(
    sink: &mut SplitSink<WebSocket, Message>,
    message: &ServerMessage,
) -> Result<(), axum::Error> {
    match serde_json::to_string(message) {
        Ok(json) => sink.send(Message::Text(json.into())).await,
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize server message");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Collection, RecordId};
    use crate::core::events::ChangeEvent;
    use serde_json::json;

    #[test]
    fn test_ping_roundtrip() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"ping"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));
    }

    #[test]
    fn test_unknown_client_message_fails_to_parse() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"subscribe"}"#).is_err());
    }

    #[test]
    fn test_event_message_serialization() {
        let envelope = EventEnvelope::new(ChangeEvent::Created {
            collection: Collection::Books,
            id: RecordId::from("b1"),
            data: json!({"title": "Kokoro"}),
        });

        let message = ServerMessage::Event { data: envelope };
        let value = serde_json::to_value(&message).unwrap();

        assert_eq!(value["type"], "event");
        assert_eq!(value["data"]["event"]["action"], "created");
        assert_eq!(value["data"]["event"]["collection"], "books");
    }

    #[test]
    fn test_welcome_serialization() {
        let message = ServerMessage::Welcome {
            connection_id: "conn_abc".to_string(),
        };
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["type"], "welcome");
        assert_eq!(value["connection_id"], "conn_abc");
    }
}
