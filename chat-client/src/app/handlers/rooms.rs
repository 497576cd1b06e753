//! # Room Directory Handlers
//!
//! Handlers for loading, opening, renaming, deleting, and searching chat
//! rooms.

use std::sync::Arc;

use async_channel::Sender;
use parking_lot::RwLock;

use shared::dto::chat::{ChatRoom, Message};

use crate::app::events::AppEvent;
use crate::app::state::{AppState, ChatView};
use crate::core::service::ChatService;

/// Fetch the sidebar room list.
pub(crate) fn handle_load_rooms(
    state: Arc<RwLock<AppState>>,
    api: Arc<dyn ChatService>,
    event_tx: Sender<AppEvent>,
) {
    {
        let mut st = state.write();
        if st.rooms_loading {
            return;
        }
        st.rooms_loading = true;
        st.api_error = None;
    }

    tokio::spawn(async move {
        let result = api.list_rooms().await;
        let _ = event_tx.send(AppEvent::RoomsLoaded(result)).await;
    });
}

/// Navigate to a room by public identifier.
///
/// The fetch is bound to the navigation generation current at spawn time;
/// a result arriving after another navigation is discarded, so a slow
/// fetch can never repopulate a view the user already left.
pub(crate) fn handle_open_room(
    state: Arc<RwLock<AppState>>,
    api: Arc<dyn ChatService>,
    event_tx: Sender<AppEvent>,
    uuid: String,
) {
    let generation = {
        let mut st = state.write();
        st.room_generation += 1;
        st.view = ChatView::Loading;
        st.api_error = None;
        st.room_generation
    };

    tokio::spawn(async move {
        let result = api.room_detail(uuid.clone()).await;
        let _ = event_tx
            .send(AppEvent::RoomOpened {
                generation,
                uuid,
                result,
            })
            .await;
    });
}

/// Start a fresh conversation with no room selected.
pub(crate) fn handle_new_chat(state: Arc<RwLock<AppState>>) {
    let mut st = state.write();
    st.room_generation += 1;
    st.clear_conversation();
}

/// Rename a room. An empty name cancels, matching the inline-rename UI.
pub(crate) fn handle_rename_room(
    api: Arc<dyn ChatService>,
    event_tx: Sender<AppEvent>,
    uuid: String,
    name: String,
) {
    if name.trim().is_empty() {
        return;
    }

    tokio::spawn(async move {
        let result = api.rename_room(uuid, name).await;
        let _ = event_tx.send(AppEvent::RoomRenamed(result)).await;
    });
}

/// Delete a room.
pub(crate) fn handle_delete_room(
    api: Arc<dyn ChatService>,
    event_tx: Sender<AppEvent>,
    uuid: String,
) {
    tokio::spawn(async move {
        let result = api.delete_room(uuid.clone()).await;
        let _ = event_tx.send(AppEvent::RoomDeleted { uuid, result }).await;
    });
}

/// Whether a room matches a search query by name or message content.
///
/// Case-insensitive; an empty query matches everything. The caller fetches
/// each room's detail for the message bodies and filters locally.
pub fn room_matches_query(room: &ChatRoom, messages: &[Message], query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    if room.name.to_lowercase().contains(&query) {
        return true;
    }
    messages
        .iter()
        .any(|m| m.text.to_lowercase().contains(&query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::dto::chat::Sender;

    fn room(name: &str) -> ChatRoom {
        ChatRoom {
            id: 1,
            uuid: "u-1".to_string(),
            name: name.to_string(),
            created_at: None,
        }
    }

    fn message(text: &str) -> Message {
        Message {
            id: Some(1),
            client_key: None,
            text: text.to_string(),
            sender: Sender::Bot,
            urls: vec![],
            created_at: None,
        }
    }

    #[test]
    fn test_room_matches_by_name() {
        assert!(room_matches_query(&room("Algebra homework"), &[], "algebra"));
        assert!(!room_matches_query(&room("Algebra homework"), &[], "biology"));
    }

    #[test]
    fn test_room_matches_by_message_text() {
        let messages = vec![message("The mitochondria is the powerhouse")];
        assert!(room_matches_query(&room("New Chat"), &messages, "mitochondria"));
    }

    #[test]
    fn test_empty_query_matches_all() {
        assert!(room_matches_query(&room("anything"), &[], ""));
        assert!(room_matches_query(&room("anything"), &[], "   "));
    }
}
