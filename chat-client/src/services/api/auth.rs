//! # Authentication Endpoints
//!
//! Sign-in, sign-up, OTP verification, password reset, and profile.

use shared::dto::auth::*;

use super::client::ApiClient;
use crate::core::error::ApiError;

impl ApiClient {
    /// Sign in with email and password.
    #[tracing::instrument(skip(self, request), fields(email = %request.email))]
    pub async fn sign_in(&self, request: SignInRequest) -> Result<SessionGrant, ApiError> {
        tracing::info!("Attempting sign-in");
        let start = std::time::Instant::now();

        let result = self
            .request_json::<SessionGrant>(
                self.http.post(self.url("api/auth/sign-in/")).json(&request),
            )
            .await;

        match &result {
            Ok(_) => {
                tracing::info!(duration_ms = start.elapsed().as_millis(), "Sign-in successful")
            }
            Err(e) => tracing::warn!(error = %e, "Sign-in failed"),
        }
        result
    }

    /// Register a new account. The account stays pending until OTP
    /// verification completes.
    pub async fn sign_up(&self, request: SignUpRequest) -> Result<SignUpResponse, ApiError> {
        self.request_json(self.http.post(self.url("api/auth/sign-up/")).json(&request))
            .await
    }

    /// Send (or resend) a verification OTP to a pending user.
    pub async fn create_otp(&self, user_id: i64) -> Result<(), ApiError> {
        self.request_empty(
            self.http
                .post(self.url("api/auth/otp/create/"))
                .json(&OtpCreateRequest { user_id }),
        )
        .await
    }

    /// Verify a signup OTP; success establishes a session.
    pub async fn verify_otp(&self, user_id: i64, otp: String) -> Result<SessionGrant, ApiError> {
        self.request_json(
            self.http
                .post(self.url("api/auth/otp/verify/"))
                .json(&OtpVerifyRequest { otp, user_id }),
        )
        .await
    }

    /// Request a password-reset OTP by email.
    pub async fn request_password_reset(
        &self,
        email: String,
    ) -> Result<PasswordResetOtpResponse, ApiError> {
        self.request_json(
            self.http
                .post(self.url("api/auth/password-reset-otp/"))
                .json(&PasswordResetOtpRequest { email }),
        )
        .await
    }

    /// Verify a password-reset OTP; the response carries the secret key
    /// authorizing the confirm step.
    pub async fn verify_reset_otp(
        &self,
        user_id: i64,
        otp: String,
    ) -> Result<ResetOtpVerifyResponse, ApiError> {
        self.request_json(
            self.http
                .post(self.url("api/auth/otp/verify/"))
                .json(&OtpVerifyRequest { otp, user_id }),
        )
        .await
    }

    /// Confirm a password reset.
    pub async fn confirm_password_reset(
        &self,
        request: PasswordResetConfirmRequest,
    ) -> Result<(), ApiError> {
        self.request_empty(
            self.http
                .post(self.url("api/auth/password-reset/confirm/"))
                .json(&request),
        )
        .await
    }

    /// Fetch the signed-in user's profile.
    pub async fn fetch_profile(&self) -> Result<ProfileResponse, ApiError> {
        self.request_json(self.http.get(self.url("api/auth/profile/")))
            .await
    }

    /// Rename the signed-in user.
    pub async fn update_profile_name(&self, name: String) -> Result<ProfileResponse, ApiError> {
        self.request_json(
            self.http
                .put(self.url("api/auth/profile/"))
                .json(&ProfileUpdateRequest { name }),
        )
        .await
    }

    /// Upload a new profile picture.
    ///
    /// Multipart bodies cannot be replayed, so this request is not retried
    /// after a 401.
    pub async fn upload_profile_picture(
        &self,
        file_name: String,
        bytes: Vec<u8>,
        mime: String,
    ) -> Result<ProfileResponse, ApiError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(&mime)
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("profile_picture", part);

        self.request_json(self.http.put(self.url("api/auth/profile/")).multipart(form))
            .await
    }
}
