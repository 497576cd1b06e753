//! # Headline Endpoint
//!
//! Localized welcome message and input placeholder.

use shared::dto::headline::HeadlineResponse;

use super::client::ApiClient;
use crate::core::error::ApiError;

impl ApiClient {
    /// Fetch the welcome message and input placeholder for a language code.
    pub async fn headline(&self, lang: &str) -> Result<HeadlineResponse, ApiError> {
        self.request_json(
            self.http
                .get(self.url("api/headline/languages/"))
                .query(&[("lang", lang)]),
        )
        .await
    }
}
