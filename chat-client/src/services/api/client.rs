//! # API Client
//!
//! Main HTTP client for backend API communication.
//!
//! Every request goes through [`ApiClient::execute`], which attaches the
//! bearer token when a session exists and performs the single 401
//! refresh-and-retry:
//!
//! 1. On a 401 for a not-yet-retried request, read the refresh token,
//!    failing immediately if absent.
//! 2. Call `POST api/auth/refresh/`.
//! 3. On success, store the new access token and re-issue the original
//!    request exactly once with it.
//! 4. On failure, clear both tokens and surface the original 401 error.
//!
//! Concurrent 401s funnel through one in-flight refresh: the refresh gate
//! is a `tokio::sync::Mutex`, and whoever wins re-checks the stored token
//! before issuing the network call, so the losers reuse the winner's token.

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use shared::dto::auth::{ErrorResponse, RefreshRequest, RefreshResponse};

use crate::core::config::ClientConfig;
use crate::core::error::ApiError;
use crate::services::storage::SessionStore;

/// HTTP client for communicating with the backend API server.
///
/// Cheap to share behind an `Arc`; the inner `reqwest::Client` maintains a
/// connection pool.
pub struct ApiClient {
    pub(crate) http: Client,
    pub(crate) config: ClientConfig,
    pub(crate) session: SessionStore,
    refresh_gate: tokio::sync::Mutex<()>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// The client is configured with the per-request timeout from
    /// [`ClientConfig`] to prevent the UI from hanging on a dead backend.
    pub fn new(config: ClientConfig, session: SessionStore) -> Self {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http,
            config,
            session,
            refresh_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Build a full URL for an API path (no leading slash).
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_base_url, path)
    }

    /// Execute a request with bearer injection and the single 401 retry.
    ///
    /// Requests whose bodies cannot be replayed (multipart streams) are not
    /// retried; the original 401 surfaces directly.
    pub(crate) async fn execute(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let retry = builder.try_clone();
        let token_used = self.session.access_token();

        let response = with_bearer(builder, token_used.as_deref()).send().await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let original_error = error_from_response(response).await;
        let Some(retry_builder) = retry else {
            return Err(original_error);
        };

        match self.refresh_access_token(token_used.as_deref()).await {
            Ok(new_token) => {
                debug!("Retrying request with refreshed access token");
                let response = with_bearer(retry_builder, Some(&new_token)).send().await?;
                Ok(response)
            }
            Err(e) => {
                warn!(error = %e, "Token refresh failed, clearing session tokens");
                self.session.clear_tokens();
                Err(original_error)
            }
        }
    }

    /// Execute a request and decode a JSON response body.
    pub(crate) async fn request_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.execute(builder).await?;
        decode(response).await
    }

    /// Execute a request where only success matters.
    pub(crate) async fn request_empty(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        let response = self.execute(builder).await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from_response(response).await)
        }
    }

    /// Exchange the refresh token for a new access token, single-flight.
    ///
    /// `stale_token` is the access token the failing request was sent with;
    /// if the stored token already differs, another task refreshed while we
    /// waited on the gate and that token is returned as-is.
    async fn refresh_access_token(&self, stale_token: Option<&str>) -> Result<String, ApiError> {
        let _guard = self.refresh_gate.lock().await;

        if let Some(current) = self.session.access_token() {
            if stale_token != Some(current.as_str()) {
                return Ok(current);
            }
        }

        let refresh_token = self.session.refresh_token().ok_or(ApiError::Status {
            status: 401,
            message: "No refresh token found".to_string(),
        })?;

        let response = self
            .http
            .post(self.url("api/auth/refresh/"))
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;
        let grant: RefreshResponse = decode(response).await?;

        self.session.set_access_token(&grant.access_token);
        info!("Access token refreshed");
        Ok(grant.access_token)
    }
}

/// Attach the `Authorization: Bearer` header when a token is present.
fn with_bearer(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => builder.header(AUTHORIZATION, format!("Bearer {}", token)),
        None => builder,
    }
}

/// Decode a JSON success body, failing fast on schema mismatch.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if !response.status().is_success() {
        return Err(error_from_response(response).await);
    }
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Turn a non-2xx response into a typed error, preferring the server's
/// `{message}` body over the canonical status reason.
async fn error_from_response(response: Response) -> ApiError {
    let status = response.status();
    let fallback = status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string();
    let message = match response.json::<ErrorResponse>().await {
        Ok(body) => body.message,
        Err(_) => fallback,
    };
    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}

// The ChatService impl lives here so the trait wiring sits next to the
// client; the per-domain request code lives in the sibling modules.
#[async_trait::async_trait]
impl crate::core::service::ChatService for ApiClient {
    async fn sign_in(
        &self,
        request: shared::SignInRequest,
    ) -> Result<shared::SessionGrant, ApiError> {
        ApiClient::sign_in(self, request).await
    }

    async fn sign_up(
        &self,
        request: shared::SignUpRequest,
    ) -> Result<shared::SignUpResponse, ApiError> {
        ApiClient::sign_up(self, request).await
    }

    async fn create_otp(&self, user_id: i64) -> Result<(), ApiError> {
        ApiClient::create_otp(self, user_id).await
    }

    async fn verify_otp(&self, user_id: i64, otp: String) -> Result<shared::SessionGrant, ApiError> {
        ApiClient::verify_otp(self, user_id, otp).await
    }

    async fn request_password_reset(
        &self,
        email: String,
    ) -> Result<shared::PasswordResetOtpResponse, ApiError> {
        ApiClient::request_password_reset(self, email).await
    }

    async fn verify_reset_otp(
        &self,
        user_id: i64,
        otp: String,
    ) -> Result<shared::ResetOtpVerifyResponse, ApiError> {
        ApiClient::verify_reset_otp(self, user_id, otp).await
    }

    async fn confirm_password_reset(
        &self,
        request: shared::PasswordResetConfirmRequest,
    ) -> Result<(), ApiError> {
        ApiClient::confirm_password_reset(self, request).await
    }

    async fn fetch_profile(&self) -> Result<shared::ProfileResponse, ApiError> {
        ApiClient::fetch_profile(self).await
    }

    async fn update_profile_name(&self, name: String) -> Result<shared::ProfileResponse, ApiError> {
        ApiClient::update_profile_name(self, name).await
    }

    async fn upload_profile_picture(
        &self,
        file_name: String,
        bytes: Vec<u8>,
        mime: String,
    ) -> Result<shared::ProfileResponse, ApiError> {
        ApiClient::upload_profile_picture(self, file_name, bytes, mime).await
    }

    async fn list_rooms(&self) -> Result<Vec<shared::ChatRoom>, ApiError> {
        ApiClient::list_rooms(self).await
    }

    async fn create_room(&self, name: String) -> Result<shared::ChatRoom, ApiError> {
        ApiClient::create_room(self, name).await
    }

    async fn room_detail(&self, uuid: String) -> Result<shared::RoomDetail, ApiError> {
        ApiClient::room_detail(self, &uuid).await
    }

    async fn rename_room(&self, uuid: String, name: String) -> Result<shared::ChatRoom, ApiError> {
        ApiClient::rename_room(self, &uuid, name).await
    }

    async fn delete_room(&self, uuid: String) -> Result<(), ApiError> {
        ApiClient::delete_room(self, &uuid).await
    }

    async fn send_message(
        &self,
        request: shared::SendMessageRequest,
    ) -> Result<shared::SendMessageResponse, ApiError> {
        ApiClient::send_message(self, request).await
    }

    async fn upload_attachment(
        &self,
        file_name: String,
        bytes: Vec<u8>,
        mime: String,
    ) -> Result<Vec<shared::UploadedFile>, ApiError> {
        ApiClient::upload_attachment(self, file_name, bytes, mime).await
    }

    async fn headline(&self, lang: String) -> Result<shared::HeadlineResponse, ApiError> {
        ApiClient::headline(self, &lang).await
    }
}
