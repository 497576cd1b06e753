//! # Attachment Handlers
//!
//! Background upload of composer attachments with immediate placeholders.

use std::sync::Arc;

use async_channel::Sender;
use parking_lot::RwLock;

use shared::dto::chat::AttachmentKind;

use crate::app::events::AppEvent;
use crate::app::state::{AppState, Attachment};
use crate::core::service::ChatService;

/// Attach a file: insert an uploading placeholder and start the upload.
///
/// The placeholder's temp id survives the upload, so the completion event
/// can swap the local placeholder URL for the server URL in place.
pub(crate) fn handle_attach_file(
    state: Arc<RwLock<AppState>>,
    api: Arc<dyn ChatService>,
    event_tx: Sender<AppEvent>,
    file_name: String,
    bytes: Vec<u8>,
    mime: String,
) {
    let temp_id = uuid::Uuid::new_v4().to_string();
    let kind = if mime.starts_with("image/") {
        AttachmentKind::Image
    } else {
        AttachmentKind::File
    };

    {
        let mut st = state.write();
        st.composer.upload_error = None;
        st.composer.attachments.push(Attachment {
            id: temp_id.clone(),
            url: format!("local://{}", temp_id),
            kind,
            name: file_name.clone(),
            uploading: true,
        });
    }

    tokio::spawn(async move {
        let result = api.upload_attachment(file_name, bytes, mime).await;
        let _ = event_tx
            .send(AppEvent::AttachmentUploadCompleted { temp_id, result })
            .await;
    });
}

/// Remove an attachment from the composer.
///
/// Only settled attachments are removable; a mid-upload placeholder is
/// resolved by its completion event instead.
pub(crate) fn handle_remove_attachment(state: Arc<RwLock<AppState>>, id: &str) {
    let mut st = state.write();
    st.composer
        .attachments
        .retain(|a| a.uploading || a.id != id);
}
