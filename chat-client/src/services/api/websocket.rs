//! # WebSocket Client for Real-Time Messages
//!
//! One subscription per open chat room: messages pushed by the server on
//! `/ws/chat/{uuid}/` are forwarded to the app event channel. The
//! subscription's lifetime is scoped to the open room; dropping it aborts
//! the read task, so no subscription outlives the view that opened it.
//!
//! Disconnects are logged and the stream ends. There is no automatic
//! reconnection; the next room open creates a fresh subscription.

use async_channel::Sender;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, error, info, trace, warn};

use shared::dto::chat::Message;

use crate::app::events::AppEvent;
use crate::core::config::ClientConfig;

/// A live push subscription for one room.
pub struct RoomSubscription {
    room_uuid: String,
    task: tokio::task::JoinHandle<()>,
}

impl RoomSubscription {
    /// Open a subscription for `room_uuid`, forwarding every pushed message
    /// to `event_tx` as [`AppEvent::MessagePushed`].
    pub fn open(config: &ClientConfig, room_uuid: &str, event_tx: Sender<AppEvent>) -> Self {
        let url = format!("{}/ws/chat/{}/", config.ws_base_url, room_uuid);
        let room_uuid = room_uuid.to_string();
        let task = tokio::spawn(run_stream(url, room_uuid.clone(), event_tx));
        Self { room_uuid, task }
    }

    /// The room this subscription belongs to.
    pub fn room_uuid(&self) -> &str {
        &self.room_uuid
    }
}

impl Drop for RoomSubscription {
    fn drop(&mut self) {
        debug!(room = %self.room_uuid, "Closing room message stream");
        self.task.abort();
    }
}

async fn run_stream(url: String, room_uuid: String, event_tx: Sender<AppEvent>) {
    info!(url = %url, room = %room_uuid, "Connecting to room message stream");

    let ws_stream = match connect_async(&url).await {
        Ok((ws_stream, response)) => {
            info!(
                room = %room_uuid,
                status = ?response.status(),
                "WebSocket connection established"
            );
            ws_stream
        }
        Err(e) => {
            error!(url = %url, error = %e, "Failed to connect to room message stream");
            return;
        }
    };

    let (mut write, mut read) = ws_stream.split();
    let mut message_count = 0u64;

    while let Some(msg) = read.next().await {
        match msg {
            Ok(WsMessage::Text(text)) => match serde_json::from_str::<Message>(&text) {
                Ok(message) => {
                    message_count += 1;
                    debug!(
                        room = %room_uuid,
                        message_count = message_count,
                        "Message received from WebSocket"
                    );
                    let event = AppEvent::MessagePushed {
                        room_uuid: room_uuid.clone(),
                        message,
                    };
                    if event_tx.send(event).await.is_err() {
                        // Receiver gone, the app is shutting down.
                        break;
                    }
                }
                Err(e) => {
                    warn!(
                        room = %room_uuid,
                        error = %e,
                        message_length = text.len(),
                        "Failed to parse pushed message JSON"
                    );
                }
            },
            Ok(WsMessage::Ping(data)) => {
                trace!(room = %room_uuid, "Received ping, sending pong");
                if let Err(e) = write.send(WsMessage::Pong(data)).await {
                    error!(room = %room_uuid, error = %e, "Failed to send pong response");
                    break;
                }
            }
            Ok(WsMessage::Close(frame)) => {
                info!(
                    room = %room_uuid,
                    code = ?frame.as_ref().map(|f| f.code),
                    "WebSocket connection closed by server"
                );
                break;
            }
            Ok(_) => {
                trace!(room = %room_uuid, "Ignoring non-text WebSocket message");
            }
            Err(e) => {
                error!(room = %room_uuid, error = %e, "WebSocket read error");
                break;
            }
        }
    }

    info!(
        room = %room_uuid,
        message_count = message_count,
        "WebSocket read loop ended"
    );
}
