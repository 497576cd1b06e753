//! # Message Endpoints
//!
//! HTTP client methods for persisting chat messages.

use shared::dto::chat::{SendMessageRequest, SendMessageResponse};

use super::client::ApiClient;
use crate::core::error::ApiError;

impl ApiClient {
    /// Persist a message in a room.
    ///
    /// The response holds the confirmed user message plus any bot replies
    /// generated synchronously; each echoes the request's `client_key` so
    /// the caller can reconcile its optimistic entry.
    #[tracing::instrument(skip(self, request), fields(room = request.room, client_key = %request.client_key))]
    pub async fn send_message(
        &self,
        request: SendMessageRequest,
    ) -> Result<SendMessageResponse, ApiError> {
        let result = self
            .request_json::<SendMessageResponse>(
                self.http
                    .post(self.url("api/chatbot/messages/"))
                    .json(&request),
            )
            .await;

        match &result {
            Ok(response) => tracing::debug!(
                returned = response.messages.len(),
                "Message persisted"
            ),
            Err(e) => tracing::warn!(error = %e, "Message persist failed"),
        }
        result
    }
}
