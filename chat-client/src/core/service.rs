//! # Service Traits
//!
//! Traits for dependency injection, enabling better testability and modularity.

use async_trait::async_trait;
use shared::dto::auth::*;
use shared::dto::chat::*;
use shared::dto::headline::HeadlineResponse;

use crate::core::error::ApiError;

/// Trait for backend chat service operations.
///
/// The app layer talks to the backend exclusively through this trait, so
/// tests can inject a mock and the HTTP client stays swappable.
#[async_trait]
pub trait ChatService: Send + Sync {
    // -- auth

    /// Sign in with email and password.
    async fn sign_in(&self, request: SignInRequest) -> Result<SessionGrant, ApiError>;

    /// Register a new account; the response carries the pending user id for
    /// the OTP verification step.
    async fn sign_up(&self, request: SignUpRequest) -> Result<SignUpResponse, ApiError>;

    /// Send (or resend) a verification OTP to a pending user.
    async fn create_otp(&self, user_id: i64) -> Result<(), ApiError>;

    /// Verify a signup OTP and establish a session.
    async fn verify_otp(&self, user_id: i64, otp: String) -> Result<SessionGrant, ApiError>;

    /// Request a password-reset OTP by email.
    async fn request_password_reset(&self, email: String)
        -> Result<PasswordResetOtpResponse, ApiError>;

    /// Verify a password-reset OTP; the response carries the secret key for
    /// the confirm step.
    async fn verify_reset_otp(&self, user_id: i64, otp: String)
        -> Result<ResetOtpVerifyResponse, ApiError>;

    /// Confirm a password reset with the secret key from OTP verification.
    async fn confirm_password_reset(
        &self,
        request: PasswordResetConfirmRequest,
    ) -> Result<(), ApiError>;

    /// Fetch the signed-in user's profile.
    async fn fetch_profile(&self) -> Result<ProfileResponse, ApiError>;

    /// Rename the signed-in user.
    async fn update_profile_name(&self, name: String) -> Result<ProfileResponse, ApiError>;

    /// Upload a new profile picture (multipart).
    async fn upload_profile_picture(
        &self,
        file_name: String,
        bytes: Vec<u8>,
        mime: String,
    ) -> Result<ProfileResponse, ApiError>;

    // -- rooms

    /// List the signed-in user's chat rooms.
    async fn list_rooms(&self) -> Result<Vec<ChatRoom>, ApiError>;

    /// Create a new room.
    async fn create_room(&self, name: String) -> Result<ChatRoom, ApiError>;

    /// Fetch a room's numeric id and message history by public identifier.
    async fn room_detail(&self, uuid: String) -> Result<RoomDetail, ApiError>;

    /// Rename a room.
    async fn rename_room(&self, uuid: String, name: String) -> Result<ChatRoom, ApiError>;

    /// Delete a room.
    async fn delete_room(&self, uuid: String) -> Result<(), ApiError>;

    // -- messages

    /// Persist a message; the response holds the confirmed user message plus
    /// any synchronous bot replies.
    async fn send_message(&self, request: SendMessageRequest)
        -> Result<SendMessageResponse, ApiError>;

    /// Upload an attachment (multipart field `files`).
    async fn upload_attachment(
        &self,
        file_name: String,
        bytes: Vec<u8>,
        mime: String,
    ) -> Result<Vec<UploadedFile>, ApiError>;

    // -- headline

    /// Fetch the localized welcome message and input placeholder.
    async fn headline(&self, lang: String) -> Result<HeadlineResponse, ApiError>;
}
