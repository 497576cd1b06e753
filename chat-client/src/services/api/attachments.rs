//! # Attachment Upload Endpoint
//!
//! Multipart upload for files and images attached to a message.

use shared::dto::chat::UploadedFile;

use super::client::ApiClient;
use crate::core::error::ApiError;

impl ApiClient {
    /// Upload one attachment under the multipart field `files`.
    ///
    /// Multipart bodies cannot be replayed, so this request is not retried
    /// after a 401.
    pub async fn upload_attachment(
        &self,
        file_name: String,
        bytes: Vec<u8>,
        mime: String,
    ) -> Result<Vec<UploadedFile>, ApiError> {
        let size = bytes.len();
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str(&mime)
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("files", part);

        tracing::debug!(file_name = %file_name, size = size, "Uploading attachment");
        self.request_json(
            self.http
                .post(self.url("api/chatbot/attachments/upload/"))
                .multipart(form),
        )
        .await
    }
}
