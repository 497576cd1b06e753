//! # Application Module
//!
//! The conversation controller: state, events, handlers, and the
//! [`ChatApp`] orchestrator the embedding UI drives.
//!
//! UI actions call [`ChatApp`] methods, which validate input, mutate state,
//! and spawn background tasks. Task results come back as [`AppEvent`]s on
//! an `async_channel`; the UI drains them with
//! [`ChatApp::pump_pending_events`] (or [`ChatApp::pump_event`] when it has
//! an async loop), and all shared state mutation happens there.

pub mod event_handler;
pub mod events;
pub mod handlers;
pub mod state;

pub use events::AppEvent;
pub use state::{AppState, ChatView, Direction, Language};

use std::sync::Arc;

use async_channel::{Receiver, Sender};
use parking_lot::RwLock;

use crate::core::config::ClientConfig;
use crate::core::service::ChatService;
use crate::services::api::RoomSubscription;
use crate::services::storage::SessionStore;

/// The chat application controller.
pub struct ChatApp {
    /// Shared application state; the UI reads it under the lock to render
    pub state: Arc<RwLock<AppState>>,
    pub(crate) api: Arc<dyn ChatService>,
    pub(crate) session: SessionStore,
    pub(crate) config: ClientConfig,
    pub(crate) event_tx: Sender<AppEvent>,
    event_rx: Receiver<AppEvent>,
    /// Push subscription for the open room; `None` outside a conversation
    pub(crate) subscription: Option<RoomSubscription>,
}

impl ChatApp {
    /// Create the controller, restoring the persisted session and language.
    pub fn new(config: ClientConfig, api: Arc<dyn ChatService>, session: SessionStore) -> Self {
        let language = session
            .language()
            .map(|code| Language::from_code(&code))
            .unwrap_or_default();
        let restored = session.load_session();
        if restored.is_some() {
            tracing::info!("Restored persisted session");
        }

        let (event_tx, event_rx) = async_channel::unbounded();
        Self {
            state: Arc::new(RwLock::new(AppState::new(language, restored))),
            api,
            session,
            config,
            event_tx,
            event_rx,
            subscription: None,
        }
    }

    /// Sender half of the event channel, for wiring extra producers.
    pub fn event_sender(&self) -> Sender<AppEvent> {
        self.event_tx.clone()
    }

    /// Drain and apply all events that are already queued.
    pub fn pump_pending_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(event);
        }
    }

    /// Await one event and apply it. Returns `false` once the channel is
    /// closed.
    pub async fn pump_event(&mut self) -> bool {
        let event = match self.event_rx.recv().await {
            Ok(event) => event,
            Err(_) => return false,
        };
        self.handle_event(event);
        true
    }

    // -- auth actions

    /// Sign in with email and password.
    pub fn sign_in(&self, email: String, password: String, remember_me: bool) {
        handlers::auth::handle_sign_in(
            self.state.clone(),
            self.api.clone(),
            self.event_tx.clone(),
            email,
            password,
            remember_me,
        );
    }

    /// Register a new account; success moves to OTP verification.
    pub fn sign_up(&self, name: String, email: String, password: String, confirm_password: String) {
        handlers::auth::handle_sign_up(
            self.state.clone(),
            self.api.clone(),
            self.event_tx.clone(),
            name,
            email,
            password,
            confirm_password,
        );
    }

    /// Verify the signup OTP currently pending.
    pub fn verify_otp(&self, code: String) {
        handlers::auth::handle_verify_otp(
            self.state.clone(),
            self.api.clone(),
            self.event_tx.clone(),
            code,
        );
    }

    /// Resend the pending OTP; only allowed once the countdown expired.
    pub fn resend_otp(&self) {
        handlers::auth::handle_resend_otp(self.state.clone(), self.api.clone(), self.event_tx.clone());
    }

    /// Advance the OTP countdown by one second. Called by the UI clock.
    pub fn tick_otp_timer(&self) {
        handlers::auth::handle_tick_otp(self.state.clone(), &self.session);
    }

    /// Request a password-reset OTP by email.
    pub fn request_password_reset(&self, email: String) {
        handlers::auth::handle_request_password_reset(
            self.state.clone(),
            self.api.clone(),
            self.event_tx.clone(),
            email,
        );
    }

    /// Verify the password-reset OTP currently pending.
    pub fn verify_reset_otp(&self, code: String) {
        handlers::auth::handle_verify_reset_otp(
            self.state.clone(),
            self.api.clone(),
            self.event_tx.clone(),
            code,
        );
    }

    /// Confirm the password reset with the stored secret key.
    pub fn confirm_password_reset(&self, new_password: String, confirm_password: String) {
        handlers::auth::handle_confirm_password_reset(
            self.state.clone(),
            &self.session,
            self.api.clone(),
            self.event_tx.clone(),
            new_password,
            confirm_password,
        );
    }

    /// Sign out: clear the durable session and reset to the initial view.
    pub fn sign_out(&mut self) {
        self.subscription = None;
        handlers::auth::handle_sign_out(self.state.clone(), &self.session);
    }

    /// Fetch the signed-in user's profile.
    pub fn load_profile(&self) {
        handlers::auth::handle_load_profile(self.api.clone(), self.event_tx.clone());
    }

    /// Rename the signed-in user.
    pub fn rename_profile(&self, name: String) {
        handlers::auth::handle_rename_profile(
            self.state.clone(),
            self.api.clone(),
            self.event_tx.clone(),
            name,
        );
    }

    /// Upload a new profile picture.
    pub fn upload_profile_picture(&self, file_name: String, bytes: Vec<u8>, mime: String) {
        handlers::auth::handle_upload_profile_picture(
            self.api.clone(),
            self.event_tx.clone(),
            file_name,
            bytes,
            mime,
        );
    }

    /// Email remembered from the last sign-in, if the user opted in.
    pub fn remembered_email(&self) -> Option<String> {
        self.session.remembered_email()
    }

    // -- settings actions

    /// Switch the UI language, persist the preference, and refetch the
    /// localized headline. The session is untouched.
    pub fn switch_language(&self, language: Language) {
        handlers::settings::handle_switch_language(
            self.state.clone(),
            &self.session,
            self.api.clone(),
            self.event_tx.clone(),
            language,
        );
    }

    /// Refetch the localized welcome text for the current language.
    pub fn refresh_headline(&self) {
        handlers::settings::handle_refresh_headline(
            self.state.clone(),
            self.api.clone(),
            self.event_tx.clone(),
        );
    }

    // -- room actions

    /// Fetch the sidebar room list.
    pub fn load_rooms(&self) {
        handlers::rooms::handle_load_rooms(self.state.clone(), self.api.clone(), self.event_tx.clone());
    }

    /// Navigate to a room by public identifier.
    ///
    /// Closes the previous room's push subscription immediately; a new one
    /// opens once the room fetch succeeds.
    pub fn open_room(&mut self, uuid: String) {
        self.subscription = None;
        handlers::rooms::handle_open_room(
            self.state.clone(),
            self.api.clone(),
            self.event_tx.clone(),
            uuid,
        );
    }

    /// Start a fresh conversation: clear the active room and its
    /// subscription.
    pub fn new_chat(&mut self) {
        self.subscription = None;
        handlers::rooms::handle_new_chat(self.state.clone());
    }

    /// Rename a room.
    pub fn rename_room(&self, uuid: String, name: String) {
        handlers::rooms::handle_rename_room(self.api.clone(), self.event_tx.clone(), uuid, name);
    }

    /// Delete a room.
    pub fn delete_room(&self, uuid: String) {
        handlers::rooms::handle_delete_room(self.api.clone(), self.event_tx.clone(), uuid);
    }

    // -- composer actions

    /// Replace the composer text.
    pub fn set_composer_text(&self, text: String) {
        self.state.write().composer.text = text;
    }

    /// Send the composed message (text and/or uploaded attachments).
    pub fn send_message(&self) {
        handlers::chat::handle_send_message(self.state.clone(), self.api.clone(), self.event_tx.clone());
    }

    /// Attach a file: a placeholder appears immediately and the upload runs
    /// in the background.
    pub fn attach_file(&self, file_name: String, bytes: Vec<u8>, mime: String) {
        handlers::attachments::handle_attach_file(
            self.state.clone(),
            self.api.clone(),
            self.event_tx.clone(),
            file_name,
            bytes,
            mime,
        );
    }

    /// Remove a composer attachment that is not mid-upload.
    pub fn remove_attachment(&self, id: &str) {
        handlers::attachments::handle_remove_attachment(self.state.clone(), id);
    }
}
