use serde::{Deserialize, Serialize};

/// Sign-in request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Sign-up request
///
/// `role` is always `"user"` for self-service registration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Sign-up response; the new account is unverified until the OTP step completes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignUpResponse {
    pub user_id: i64,
}

/// Profile summary embedded in session grants
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileSummary {
    pub name: String,
}

/// Session grant returned by sign-in and OTP verification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionGrant {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub email_address: String,
    pub profile: ProfileSummary,
}

/// Request a fresh OTP for a pending user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OtpCreateRequest {
    pub user_id: i64,
}

/// Submit an OTP for verification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OtpVerifyRequest {
    pub otp: String,
    pub user_id: i64,
}

/// Request a password-reset OTP by email
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PasswordResetOtpRequest {
    pub email: String,
}

/// Response to a password-reset OTP request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PasswordResetOtpResponse {
    pub user_id: i64,
}

/// Reset-OTP verification response; `secret_key` authorizes the confirm step
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResetOtpVerifyResponse {
    pub user_id: i64,
    pub secret_key: String,
}

/// Confirm a password reset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PasswordResetConfirmRequest {
    pub user_id: i64,
    pub secret_key: String,
    pub new_password: String,
}

/// Exchange a refresh token for a new access token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Refresh response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// User profile details
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

/// Profile response wrapper
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileResponse {
    pub user_profile: UserProfile,
}

/// Profile rename request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileUpdateRequest {
    pub name: String,
}

/// Error response body used by all endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub message: String,
}
