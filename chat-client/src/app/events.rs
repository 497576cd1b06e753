//! # Application Events
//!
//! Event types for async task communication between background tasks and
//! the embedding UI's event loop.

use shared::dto::auth::{
    PasswordResetOtpResponse, ProfileResponse, ResetOtpVerifyResponse, SessionGrant,
    SignUpResponse,
};
use shared::dto::chat::{ChatRoom, Message, RoomDetail, SendMessageResponse, UploadedFile};
use shared::dto::headline::HeadlineResponse;

use crate::core::error::ApiError;

/// Async task results sent back to the app loop
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Sign-in completed; `remember_me` controls email persistence
    SignInResult {
        email: String,
        remember_me: bool,
        result: Result<SessionGrant, ApiError>,
    },
    /// Sign-up completed; success moves to OTP verification
    SignUpResult {
        email: String,
        result: Result<SignUpResponse, ApiError>,
    },
    /// OTP resend completed
    OtpCreateResult(Result<(), ApiError>),
    /// Signup OTP verification completed; success establishes a session
    OtpVerifyResult(Result<SessionGrant, ApiError>),
    /// Password-reset OTP requested
    ResetOtpRequested {
        email: String,
        result: Result<PasswordResetOtpResponse, ApiError>,
    },
    /// Password-reset OTP verified; carries the confirm secret
    ResetOtpVerified(Result<ResetOtpVerifyResponse, ApiError>),
    /// Password reset confirmed
    ResetConfirmed(Result<(), ApiError>),
    /// Profile fetched
    ProfileLoaded(Result<ProfileResponse, ApiError>),
    /// Profile updated (rename or picture upload)
    ProfileUpdated(Result<ProfileResponse, ApiError>),
    /// Room list fetched
    RoomsLoaded(Result<Vec<ChatRoom>, ApiError>),
    /// Room detail fetched; discarded when `generation` is stale
    RoomOpened {
        generation: u64,
        uuid: String,
        result: Result<RoomDetail, ApiError>,
    },
    /// Message persist completed; `created_room` is set when this send
    /// created the room
    MessageSendCompleted {
        client_key: String,
        created_room: Option<ChatRoom>,
        result: Result<SendMessageResponse, ApiError>,
    },
    /// Delayed navigation to a freshly created room
    NavigateToRoom { uuid: String },
    /// A message arrived on the room push channel
    MessagePushed { room_uuid: String, message: Message },
    /// Attachment upload completed; `temp_id` identifies the placeholder
    AttachmentUploadCompleted {
        temp_id: String,
        result: Result<Vec<UploadedFile>, ApiError>,
    },
    /// Room rename completed
    RoomRenamed(Result<ChatRoom, ApiError>),
    /// Room delete completed
    RoomDeleted {
        uuid: String,
        result: Result<(), ApiError>,
    },
    /// Localized headline fetched
    HeadlineLoaded(Result<HeadlineResponse, ApiError>),
}
