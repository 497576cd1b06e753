//! # Chat Data Transfer Objects
//!
//! Defines request and response structures for the chatbot room, message,
//! and attachment endpoints, plus the objects pushed over the per-room
//! WebSocket channel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted conversation thread
///
/// Rooms carry both a numeric `id` (used by the message-persist endpoint)
/// and an opaque public `uuid` (used in URLs and the WebSocket path).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRoom {
    pub id: i64,
    pub uuid: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Create a new room
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateRoomRequest {
    pub name: String,
}

/// Rename an existing room
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenameRoomRequest {
    pub name: String,
}

/// Room detail: numeric id plus the full message history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomDetail {
    pub id: i64,
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// Message author
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// Attachment kind, decided client-side from the MIME type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    File,
}

/// Attachment reference carried inside a message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageUrl {
    pub file_url: String,
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
}

/// A chat message, as persisted or as pushed over the WebSocket
///
/// `client_key` is assigned by the sending client and echoed back by the
/// server, allowing optimistic entries to be reconciled without duplicates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_key: Option<String>,
    #[serde(default)]
    pub text: String,
    pub sender: Sender,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub urls: Vec<MessageUrl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Persist a message in a room
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendMessageRequest {
    pub room: i64,
    pub text: String,
    pub sender: Sender,
    pub lang: String,
    #[serde(default)]
    pub urls: Vec<MessageUrl>,
    pub client_key: String,
}

/// Response to a message persist: the confirmed user message plus any
/// bot replies generated synchronously.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SendMessageResponse {
    pub messages: Vec<Message>,
}

/// One uploaded file as returned by the attachment endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_url: String,
}
