//! # Authentication Handlers
//!
//! Handlers for sign-in, sign-up, OTP verification, password reset, and
//! profile actions.

use std::sync::Arc;

use async_channel::Sender;
use parking_lot::RwLock;

use shared::dto::auth::{PasswordResetConfirmRequest, SignInRequest, SignUpRequest};

use crate::app::events::AppEvent;
use crate::app::state::AppState;
use crate::core::service::ChatService;
use crate::services::storage::SessionStore;
use crate::utils::validation;

/// Seconds a fresh OTP countdown runs before resend unlocks.
pub const OTP_RESEND_SECS: u32 = 120;

/// Handle a sign-in attempt.
pub(crate) fn handle_sign_in(
    state: Arc<RwLock<AppState>>,
    api: Arc<dyn ChatService>,
    event_tx: Sender<AppEvent>,
    email: String,
    password: String,
    remember_me: bool,
) {
    if email.is_empty() || password.is_empty() {
        state.write().api_error = Some("Email and password required".to_string());
        return;
    }

    state.write().api_error = None;

    tokio::spawn(async move {
        let result = api
            .sign_in(SignInRequest {
                email: email.clone(),
                password,
            })
            .await;
        let _ = event_tx
            .send(AppEvent::SignInResult {
                email,
                remember_me,
                result,
            })
            .await;
    });
}

/// Handle a sign-up attempt.
pub(crate) fn handle_sign_up(
    state: Arc<RwLock<AppState>>,
    api: Arc<dyn ChatService>,
    event_tx: Sender<AppEvent>,
    name: String,
    email: String,
    password: String,
    confirm_password: String,
) {
    if name.is_empty() || email.is_empty() || password.is_empty() {
        state.write().api_error = Some("All fields are required".to_string());
        return;
    }

    let email_check = validation::validate_email(&email);
    if !email_check.is_valid {
        state.write().api_error = email_check.error;
        return;
    }

    if password != confirm_password {
        state.write().api_error = Some("Passwords do not match".to_string());
        return;
    }

    state.write().api_error = None;

    tokio::spawn(async move {
        let result = api
            .sign_up(SignUpRequest {
                name,
                email: email.clone(),
                password,
                role: "user".to_string(),
            })
            .await;
        let _ = event_tx.send(AppEvent::SignUpResult { email, result }).await;
    });
}

/// Verify the pending signup OTP.
pub(crate) fn handle_verify_otp(
    state: Arc<RwLock<AppState>>,
    api: Arc<dyn ChatService>,
    event_tx: Sender<AppEvent>,
    code: String,
) {
    let user_id = {
        let mut st = state.write();
        let code_check = validation::validate_otp(&code);
        if !code_check.is_valid {
            if let Some(otp) = &mut st.otp {
                otp.error = code_check.error;
            }
            return;
        }
        match &mut st.otp {
            Some(otp) => {
                otp.error = None;
                otp.user_id
            }
            None => {
                st.api_error = Some("No verification in progress".to_string());
                return;
            }
        }
    };

    tokio::spawn(async move {
        let result = api.verify_otp(user_id, code).await;
        let _ = event_tx.send(AppEvent::OtpVerifyResult(result)).await;
    });
}

/// Resend the pending OTP. Ignored while the countdown is still running.
pub(crate) fn handle_resend_otp(
    state: Arc<RwLock<AppState>>,
    api: Arc<dyn ChatService>,
    event_tx: Sender<AppEvent>,
) {
    let user_id = {
        let st = state.read();
        match &st.otp {
            Some(otp) if otp.resend_enabled => otp.user_id,
            _ => return,
        }
    };

    tokio::spawn(async move {
        let result = api.create_otp(user_id).await;
        let _ = event_tx.send(AppEvent::OtpCreateResult(result)).await;
    });
}

/// Advance the OTP countdown by one second.
///
/// The remaining value persists so a reload resumes the countdown; at zero
/// the resend control unlocks and the stored countdown is cleared.
pub(crate) fn handle_tick_otp(state: Arc<RwLock<AppState>>, session: &SessionStore) {
    let mut st = state.write();
    if let Some(otp) = &mut st.otp {
        if otp.remaining_secs > 0 {
            otp.remaining_secs -= 1;
            if otp.remaining_secs == 0 {
                otp.resend_enabled = true;
                session.clear_otp_countdown();
            } else {
                session.set_otp_countdown(otp.remaining_secs);
            }
        }
    }
}

/// Request a password-reset OTP by email.
pub(crate) fn handle_request_password_reset(
    state: Arc<RwLock<AppState>>,
    api: Arc<dyn ChatService>,
    event_tx: Sender<AppEvent>,
    email: String,
) {
    let email_check = validation::validate_email(&email);
    if !email_check.is_valid {
        state.write().api_error = email_check.error;
        return;
    }
    state.write().api_error = None;

    tokio::spawn(async move {
        let result = api.request_password_reset(email.clone()).await;
        let _ = event_tx
            .send(AppEvent::ResetOtpRequested { email, result })
            .await;
    });
}

/// Verify the pending password-reset OTP.
pub(crate) fn handle_verify_reset_otp(
    state: Arc<RwLock<AppState>>,
    api: Arc<dyn ChatService>,
    event_tx: Sender<AppEvent>,
    code: String,
) {
    let user_id = {
        let mut st = state.write();
        let code_check = validation::validate_otp(&code);
        if !code_check.is_valid {
            if let Some(otp) = &mut st.otp {
                otp.error = code_check.error;
            }
            return;
        }
        match &mut st.otp {
            Some(otp) => {
                otp.error = None;
                otp.user_id
            }
            None => {
                st.api_error = Some("No verification in progress".to_string());
                return;
            }
        }
    };

    tokio::spawn(async move {
        let result = api.verify_reset_otp(user_id, code).await;
        let _ = event_tx.send(AppEvent::ResetOtpVerified(result)).await;
    });
}

/// Confirm the password reset using the stored user id and secret key.
pub(crate) fn handle_confirm_password_reset(
    state: Arc<RwLock<AppState>>,
    session: &SessionStore,
    api: Arc<dyn ChatService>,
    event_tx: Sender<AppEvent>,
    new_password: String,
    confirm_password: String,
) {
    if new_password != confirm_password {
        state.write().api_error = Some("Passwords do not match".to_string());
        return;
    }

    let Some((user_id, secret_key)) = session.reset_credentials() else {
        state.write().api_error =
            Some("Missing user ID or secret key. Please try again.".to_string());
        return;
    };
    state.write().api_error = None;

    tokio::spawn(async move {
        let result = api
            .confirm_password_reset(PasswordResetConfirmRequest {
                user_id,
                secret_key,
                new_password,
            })
            .await;
        let _ = event_tx.send(AppEvent::ResetConfirmed(result)).await;
    });
}

/// Sign out: drop durable session material and reset the state.
pub(crate) fn handle_sign_out(state: Arc<RwLock<AppState>>, session: &SessionStore) {
    session.clear_session();
    let mut st = state.write();
    st.session = None;
    st.rooms.clear();
    st.profile = None;
    st.clear_conversation();
    tracing::info!("Signed out");
}

/// Fetch the signed-in user's profile.
pub(crate) fn handle_load_profile(api: Arc<dyn ChatService>, event_tx: Sender<AppEvent>) {
    tokio::spawn(async move {
        let result = api.fetch_profile().await;
        let _ = event_tx.send(AppEvent::ProfileLoaded(result)).await;
    });
}

/// Rename the signed-in user.
pub(crate) fn handle_rename_profile(
    state: Arc<RwLock<AppState>>,
    api: Arc<dyn ChatService>,
    event_tx: Sender<AppEvent>,
    name: String,
) {
    if name.trim().is_empty() {
        state.write().api_error = Some("Full name cannot be empty".to_string());
        return;
    }

    tokio::spawn(async move {
        let result = api.update_profile_name(name).await;
        let _ = event_tx.send(AppEvent::ProfileUpdated(result)).await;
    });
}

/// Upload a new profile picture.
pub(crate) fn handle_upload_profile_picture(
    api: Arc<dyn ChatService>,
    event_tx: Sender<AppEvent>,
    file_name: String,
    bytes: Vec<u8>,
    mime: String,
) {
    tokio::spawn(async move {
        let result = api.upload_profile_picture(file_name, bytes, mime).await;
        let _ = event_tx.send(AppEvent::ProfileUpdated(result)).await;
    });
}
