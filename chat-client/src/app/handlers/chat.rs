//! # Send-Message Handler
//!
//! The optimistic send flow: append the user's message immediately, create
//! the room first if this is a fresh conversation, persist via the message
//! endpoint, and let the event handler reconcile the server echo.

use std::sync::Arc;

use async_channel::Sender;
use parking_lot::RwLock;

use shared::dto::chat::{Message, MessageUrl, SendMessageRequest, Sender as MessageSender};

use crate::app::events::AppEvent;
use crate::app::state::{AppState, ChatView};
use crate::core::service::ChatService;

/// Name given to a room created implicitly by a first send.
const NEW_ROOM_NAME: &str = "New Chat";

/// Send the composed message.
///
/// Rejected silently (like the disabled send button) when the composer is
/// empty, an attachment is still uploading, or a send is already in
/// flight. The in-flight gate doubles as the room-creation guard: a fresh
/// conversation can never have two outstanding creations because the first
/// send blocks the second until its completion event lands.
pub(crate) fn handle_send_message(
    state: Arc<RwLock<AppState>>,
    api: Arc<dyn ChatService>,
    event_tx: Sender<AppEvent>,
) {
    let (text, urls, lang, room_id, client_key) = {
        let mut st = state.write();
        if st.composer.is_empty() || st.composer.has_uploading() || st.is_sending {
            return;
        }
        if st.active_room.is_none() && st.room_creation_in_flight {
            return;
        }

        let client_key = uuid::Uuid::new_v4().to_string();
        let text = st.composer.text.clone();
        let urls: Vec<MessageUrl> = st
            .composer
            .attachments
            .iter()
            .map(|a| MessageUrl {
                file_url: a.url.clone(),
                kind: a.kind,
            })
            .collect();

        st.push_optimistic(Message {
            id: None,
            client_key: Some(client_key.clone()),
            text: text.clone(),
            sender: MessageSender::User,
            urls: urls.clone(),
            created_at: None,
        });
        st.view = ChatView::Conversation;
        st.is_sending = true;
        st.api_error = None;
        if st.active_room.is_none() {
            st.room_creation_in_flight = true;
        }
        st.composer.text.clear();
        st.composer.attachments.clear();

        let room_id = st.active_room.as_ref().map(|r| r.id);
        let lang = st.language.code().to_string();
        (text, urls, lang, room_id, client_key)
    };

    tokio::spawn(async move {
        let mut created_room = None;
        let room_id = match room_id {
            Some(id) => id,
            None => match api.create_room(NEW_ROOM_NAME.to_string()).await {
                Ok(room) => {
                    tracing::info!(room_id = room.id, uuid = %room.uuid, "Created room for first message");
                    let id = room.id;
                    created_room = Some(room);
                    id
                }
                Err(e) => {
                    let _ = event_tx
                        .send(AppEvent::MessageSendCompleted {
                            client_key,
                            created_room: None,
                            result: Err(e),
                        })
                        .await;
                    return;
                }
            },
        };

        let request = SendMessageRequest {
            room: room_id,
            text,
            sender: MessageSender::User,
            lang,
            urls,
            client_key: client_key.clone(),
        };
        let result = api.send_message(request).await;
        let _ = event_tx
            .send(AppEvent::MessageSendCompleted {
                client_key,
                created_room,
                result,
            })
            .await;
    });
}
