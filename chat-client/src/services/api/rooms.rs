//! # Chat Room Endpoints
//!
//! HTTP client methods for the room directory.

use shared::dto::chat::{ChatRoom, CreateRoomRequest, RenameRoomRequest, RoomDetail};

use super::client::ApiClient;
use crate::core::error::ApiError;

impl ApiClient {
    /// List the signed-in user's chat rooms.
    pub async fn list_rooms(&self) -> Result<Vec<ChatRoom>, ApiError> {
        self.request_json(self.http.get(self.url("api/chatbot/rooms/")))
            .await
    }

    /// Create a new room. The response carries both the numeric id (used by
    /// the message endpoint) and the public uuid (used for navigation).
    pub async fn create_room(&self, name: String) -> Result<ChatRoom, ApiError> {
        self.request_json(
            self.http
                .post(self.url("api/chatbot/rooms/"))
                .json(&CreateRoomRequest { name }),
        )
        .await
    }

    /// Fetch a room's numeric id and message history by public identifier.
    pub async fn room_detail(&self, uuid: &str) -> Result<RoomDetail, ApiError> {
        self.request_json(
            self.http
                .get(self.url(&format!("api/chatbot/rooms/{}/", uuid))),
        )
        .await
    }

    /// Rename a room; the updated room is returned.
    pub async fn rename_room(&self, uuid: &str, name: String) -> Result<ChatRoom, ApiError> {
        self.request_json(
            self.http
                .patch(self.url(&format!("api/chatbot/rooms/{}/", uuid)))
                .json(&RenameRoomRequest { name }),
        )
        .await
    }

    /// Delete a room.
    pub async fn delete_room(&self, uuid: &str) -> Result<(), ApiError> {
        self.request_empty(
            self.http
                .delete(self.url(&format!("api/chatbot/rooms/{}/", uuid))),
        )
        .await
    }
}
