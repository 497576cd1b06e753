//! # Event Handler
//!
//! Applies async task results to application state. This is the only place
//! background work touches shared state, so ordering between the send
//! response and the push channel is resolved here, by client key, instead
//! of racing appends.

use std::time::{Duration, Instant};

use tracing::{debug, error, warn};

use shared::dto::auth::{ProfileResponse, SessionGrant};
use shared::dto::chat::{ChatRoom, RoomDetail, SendMessageResponse, UploadedFile};

use crate::app::events::AppEvent;
use crate::app::state::{ActiveRoom, ChatView, Delivery, MessageEntry, OtpState};
use crate::app::ChatApp;
use crate::core::error::ApiError;
use crate::services::api::RoomSubscription;
use crate::services::storage::Session;

use super::handlers::auth::OTP_RESEND_SECS;

/// Delay before navigating to a room created by a first send.
const NAVIGATE_DELAY: Duration = Duration::from_secs(2);

impl ChatApp {
    /// Apply one async event result to application state.
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::SignInResult {
                email,
                remember_me,
                result,
            } => self.handle_sign_in_result(email, remember_me, result),
            AppEvent::SignUpResult { email, result } => self.handle_sign_up_result(email, result),
            AppEvent::OtpCreateResult(result) => self.handle_otp_create_result(result),
            AppEvent::OtpVerifyResult(result) => self.handle_otp_verify_result(result),
            AppEvent::ResetOtpRequested { email, result } => {
                self.handle_reset_otp_requested(email, result)
            }
            AppEvent::ResetOtpVerified(result) => self.handle_reset_otp_verified(result),
            AppEvent::ResetConfirmed(result) => self.handle_reset_confirmed(result),
            AppEvent::ProfileLoaded(result) | AppEvent::ProfileUpdated(result) => {
                self.handle_profile_result(result)
            }
            AppEvent::RoomsLoaded(result) => self.handle_rooms_loaded(result),
            AppEvent::RoomOpened {
                generation,
                uuid,
                result,
            } => self.handle_room_opened(generation, uuid, result),
            AppEvent::MessageSendCompleted {
                client_key,
                created_room,
                result,
            } => self.handle_message_send_completed(client_key, created_room, result),
            AppEvent::NavigateToRoom { uuid } => self.handle_navigate_to_room(uuid),
            AppEvent::MessagePushed { room_uuid, message } => {
                self.handle_message_pushed(room_uuid, message)
            }
            AppEvent::AttachmentUploadCompleted { temp_id, result } => {
                self.handle_attachment_upload_completed(temp_id, result)
            }
            AppEvent::RoomRenamed(result) => self.handle_room_renamed(result),
            AppEvent::RoomDeleted { uuid, result } => self.handle_room_deleted(uuid, result),
            AppEvent::HeadlineLoaded(result) => self.handle_headline_loaded(result),
        }
    }

    fn establish_session(&mut self, grant: SessionGrant) {
        let session = Session {
            access_token: grant.access_token,
            refresh_token: grant.refresh_token,
            email: grant.email_address,
            username: grant.profile.name,
        };
        self.session.save_session(&session);
        let mut st = self.state.write();
        st.session = Some(session);
        st.api_error = None;
    }

    fn handle_sign_in_result(
        &mut self,
        email: String,
        remember_me: bool,
        result: Result<SessionGrant, ApiError>,
    ) {
        match result {
            Ok(grant) => {
                self.establish_session(grant);
                if remember_me {
                    self.session.set_remembered_email(&email);
                } else {
                    self.session.clear_remembered_email();
                }
            }
            Err(e) => {
                self.state.write().api_error = Some(e.to_string());
            }
        }
    }

    fn handle_sign_up_result(
        &mut self,
        email: String,
        result: Result<shared::SignUpResponse, ApiError>,
    ) {
        match result {
            Ok(response) => {
                self.session.set_pending_otp(response.user_id, &email);
                self.session.set_otp_countdown(OTP_RESEND_SECS);
                let mut st = self.state.write();
                st.otp = Some(OtpState {
                    user_id: response.user_id,
                    email,
                    remaining_secs: OTP_RESEND_SECS,
                    resend_enabled: false,
                    error: None,
                });
                st.api_error = None;
            }
            Err(e) => {
                self.state.write().api_error = Some(e.to_string());
            }
        }
    }

    fn handle_otp_create_result(&mut self, result: Result<(), ApiError>) {
        let mut st = self.state.write();
        let Some(otp) = &mut st.otp else { return };
        match result {
            Ok(()) => {
                otp.remaining_secs = OTP_RESEND_SECS;
                otp.resend_enabled = false;
                otp.error = None;
                self.session.set_otp_countdown(OTP_RESEND_SECS);
            }
            Err(e) => {
                otp.error = Some(e.to_string());
            }
        }
    }

    fn handle_otp_verify_result(&mut self, result: Result<SessionGrant, ApiError>) {
        match result {
            Ok(grant) => {
                self.establish_session(grant);
                self.session.clear_pending_otp();
                self.state.write().otp = None;
            }
            Err(e) => {
                let mut st = self.state.write();
                if let Some(otp) = &mut st.otp {
                    otp.error = Some(e.to_string());
                } else {
                    st.api_error = Some(e.to_string());
                }
            }
        }
    }

    fn handle_reset_otp_requested(
        &mut self,
        email: String,
        result: Result<shared::PasswordResetOtpResponse, ApiError>,
    ) {
        match result {
            Ok(response) => {
                self.session.set_reset_user_id(response.user_id);
                self.session.set_otp_countdown(OTP_RESEND_SECS);
                let mut st = self.state.write();
                st.otp = Some(OtpState {
                    user_id: response.user_id,
                    email,
                    remaining_secs: OTP_RESEND_SECS,
                    resend_enabled: false,
                    error: None,
                });
                st.api_error = None;
            }
            Err(e) => {
                self.state.write().api_error = Some(e.to_string());
            }
        }
    }

    fn handle_reset_otp_verified(
        &mut self,
        result: Result<shared::ResetOtpVerifyResponse, ApiError>,
    ) {
        match result {
            Ok(response) => {
                self.session.set_reset_secret_key(&response.secret_key);
                self.session.clear_otp_countdown();
                self.state.write().otp = None;
            }
            Err(e) => {
                let mut st = self.state.write();
                if let Some(otp) = &mut st.otp {
                    otp.error = Some(e.to_string());
                }
            }
        }
    }

    fn handle_reset_confirmed(&mut self, result: Result<(), ApiError>) {
        match result {
            Ok(()) => {
                self.session.clear_reset_credentials();
                self.state.write().api_error = None;
            }
            Err(e) => {
                self.state.write().api_error = Some(e.to_string());
            }
        }
    }

    fn handle_profile_result(&mut self, result: Result<ProfileResponse, ApiError>) {
        match result {
            Ok(response) => {
                self.state.write().profile = Some(response.user_profile);
            }
            Err(e) => {
                self.state.write().api_error = Some(e.to_string());
            }
        }
    }

    fn handle_rooms_loaded(&mut self, result: Result<Vec<ChatRoom>, ApiError>) {
        let mut st = self.state.write();
        st.rooms_loading = false;
        match result {
            Ok(rooms) => st.rooms = rooms,
            Err(e) => st.api_error = Some(e.to_string()),
        }
    }

    fn handle_room_opened(
        &mut self,
        generation: u64,
        uuid: String,
        result: Result<RoomDetail, ApiError>,
    ) {
        let mut st = self.state.write();
        if generation != st.room_generation {
            debug!(uuid = %uuid, generation = generation, "Discarding stale room fetch");
            return;
        }

        match result {
            Ok(detail) => {
                st.messages = detail
                    .messages
                    .into_iter()
                    .map(|message| MessageEntry {
                        message,
                        delivery: Delivery::Confirmed,
                    })
                    .collect();
                st.active_room = Some(ActiveRoom {
                    id: detail.id,
                    uuid: uuid.clone(),
                });
                st.view = ChatView::Conversation;
                st.api_error = None;
                st.request_scroll(Instant::now());
                drop(st);

                self.subscription = Some(RoomSubscription::open(
                    &self.config,
                    &uuid,
                    self.event_tx.clone(),
                ));
            }
            Err(e) => {
                st.api_error = Some(e.to_string());
                st.view = if st.active_room.is_some() {
                    ChatView::Conversation
                } else {
                    ChatView::Initial
                };
            }
        }
    }

    fn handle_message_send_completed(
        &mut self,
        client_key: String,
        created_room: Option<ChatRoom>,
        result: Result<SendMessageResponse, ApiError>,
    ) {
        let mut st = self.state.write();
        st.is_sending = false;
        st.room_creation_in_flight = false;

        let mut navigate_to = None;
        if let Some(room) = created_room {
            st.active_room = Some(ActiveRoom {
                id: room.id,
                uuid: room.uuid.clone(),
            });
            navigate_to = Some(room.uuid.clone());
            st.rooms.insert(0, room);
        }

        match result {
            Ok(response) => {
                for message in response.messages {
                    st.reconcile_message(message);
                }
                st.api_error = None;
            }
            Err(e) => {
                // The optimistic entry stays visible, marked pending.
                warn!(client_key = %client_key, error = %e, "Message persist failed");
                st.api_error = Some(e.to_string());
            }
        }
        drop(st);

        if let Some(uuid) = navigate_to {
            let event_tx = self.event_tx.clone();
            tokio::spawn(async move {
                tokio::time::sleep(NAVIGATE_DELAY).await;
                let _ = event_tx.send(AppEvent::NavigateToRoom { uuid }).await;
            });
        }
    }

    fn handle_navigate_to_room(&mut self, uuid: String) {
        let still_active = {
            let st = self.state.read();
            st.active_room.as_ref().map(|r| r.uuid.as_str()) == Some(uuid.as_str())
        };
        if still_active {
            self.open_room(uuid);
        } else {
            debug!(uuid = %uuid, "Skipping delayed navigation, room no longer active");
        }
    }

    fn handle_message_pushed(&mut self, room_uuid: String, message: shared::Message) {
        let mut st = self.state.write();
        let is_active_room =
            st.active_room.as_ref().map(|r| r.uuid.as_str()) == Some(room_uuid.as_str());
        if is_active_room {
            st.reconcile_message(message);
        } else {
            debug!(room = %room_uuid, "Dropping push for inactive room");
        }
    }

    fn handle_attachment_upload_completed(
        &mut self,
        temp_id: String,
        result: Result<Vec<UploadedFile>, ApiError>,
    ) {
        let mut st = self.state.write();
        match result {
            Ok(files) => match files.into_iter().next() {
                Some(file) => {
                    if let Some(attachment) = st
                        .composer
                        .attachments
                        .iter_mut()
                        .find(|a| a.id == temp_id)
                    {
                        attachment.url = file.file_url;
                        attachment.uploading = false;
                    }
                }
                None => {
                    st.composer.attachments.retain(|a| a.id != temp_id);
                    st.composer.upload_error = Some("Upload failed".to_string());
                }
            },
            Err(e) => {
                st.composer.attachments.retain(|a| a.id != temp_id);
                st.composer.upload_error = Some(e.to_string());
            }
        }
    }

    fn handle_room_renamed(&mut self, result: Result<ChatRoom, ApiError>) {
        match result {
            Ok(room) => {
                let mut st = self.state.write();
                if let Some(existing) = st.rooms.iter_mut().find(|r| r.id == room.id) {
                    *existing = room;
                }
            }
            Err(e) => {
                warn!(error = %e, "Room rename failed");
            }
        }
    }

    fn handle_room_deleted(&mut self, uuid: String, result: Result<(), ApiError>) {
        match result {
            Ok(()) => {
                let mut st = self.state.write();
                st.rooms.retain(|r| r.uuid != uuid);
                let was_active =
                    st.active_room.as_ref().map(|r| r.uuid.as_str()) == Some(uuid.as_str());
                if was_active {
                    st.clear_conversation();
                    drop(st);
                    self.subscription = None;
                }
            }
            Err(e) => {
                error!(uuid = %uuid, error = %e, "Room delete failed");
            }
        }
    }

    fn handle_headline_loaded(&mut self, result: Result<shared::HeadlineResponse, ApiError>) {
        match result {
            Ok(headline) => {
                self.state.write().headline = Some(headline);
            }
            Err(e) => {
                self.state.write().api_error = Some(e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use shared::dto::auth::*;
    use shared::dto::chat::*;
    use shared::dto::headline::HeadlineResponse;

    use crate::app::state::{Attachment, Delivery, Language};
    use crate::app::{AppEvent, ChatApp, ChatView};
    use crate::core::config::ClientConfig;
    use crate::core::error::ApiError;
    use crate::core::service::ChatService;
    use crate::services::storage::{MemoryStore, SessionStore};

    fn not_wired<T>() -> Result<T, ApiError> {
        Err(ApiError::Network("not wired in this test".to_string()))
    }

    /// Canned-response service for controller tests.
    #[derive(Default)]
    struct MockService {
        create_room_calls: AtomicUsize,
        room: Mutex<Option<ChatRoom>>,
        details: Mutex<HashMap<String, RoomDetail>>,
        slow_detail_uuid: Mutex<Option<String>>,
        grant: Mutex<Option<SessionGrant>>,
        bot_reply: Mutex<Option<String>>,
        upload_result: Mutex<Option<Result<Vec<UploadedFile>, ApiError>>>,
        last_send: Mutex<Option<SendMessageRequest>>,
    }

    impl MockService {
        fn with_room(room: ChatRoom) -> Self {
            let service = Self::default();
            *service.room.lock() = Some(room);
            service
        }

        fn set_detail(&self, uuid: &str, detail: RoomDetail) {
            self.details.lock().insert(uuid.to_string(), detail);
        }

        fn set_grant(&self, grant: SessionGrant) {
            *self.grant.lock() = Some(grant);
        }
    }

    #[async_trait]
    impl ChatService for MockService {
        async fn sign_in(&self, _request: SignInRequest) -> Result<SessionGrant, ApiError> {
            self.grant.lock().clone().ok_or(ApiError::Status {
                status: 400,
                message: "Login failed. Please try again.".to_string(),
            })
        }

        async fn sign_up(&self, _request: SignUpRequest) -> Result<SignUpResponse, ApiError> {
            Ok(SignUpResponse { user_id: 42 })
        }

        async fn create_otp(&self, _user_id: i64) -> Result<(), ApiError> {
            Ok(())
        }

        async fn verify_otp(&self, _user_id: i64, _otp: String) -> Result<SessionGrant, ApiError> {
            self.grant.lock().clone().ok_or(ApiError::Status {
                status: 400,
                message: "Invalid OTP. Please try again.".to_string(),
            })
        }

        async fn request_password_reset(
            &self,
            _email: String,
        ) -> Result<PasswordResetOtpResponse, ApiError> {
            Ok(PasswordResetOtpResponse { user_id: 42 })
        }

        async fn verify_reset_otp(
            &self,
            user_id: i64,
            _otp: String,
        ) -> Result<ResetOtpVerifyResponse, ApiError> {
            Ok(ResetOtpVerifyResponse {
                user_id,
                secret_key: "secret".to_string(),
            })
        }

        async fn confirm_password_reset(
            &self,
            _request: PasswordResetConfirmRequest,
        ) -> Result<(), ApiError> {
            Ok(())
        }

        async fn fetch_profile(&self) -> Result<ProfileResponse, ApiError> {
            not_wired()
        }

        async fn update_profile_name(&self, _name: String) -> Result<ProfileResponse, ApiError> {
            not_wired()
        }

        async fn upload_profile_picture(
            &self,
            _file_name: String,
            _bytes: Vec<u8>,
            _mime: String,
        ) -> Result<ProfileResponse, ApiError> {
            not_wired()
        }

        async fn list_rooms(&self) -> Result<Vec<ChatRoom>, ApiError> {
            Ok(vec![])
        }

        async fn create_room(&self, name: String) -> Result<ChatRoom, ApiError> {
            self.create_room_calls.fetch_add(1, Ordering::SeqCst);
            let room = self.room.lock().clone();
            room.map(|mut r| {
                r.name = name;
                r
            })
            .ok_or(ApiError::Status {
                status: 500,
                message: "room creation not wired".to_string(),
            })
        }

        async fn room_detail(&self, uuid: String) -> Result<RoomDetail, ApiError> {
            let is_slow = self.slow_detail_uuid.lock().as_deref() == Some(uuid.as_str());
            if is_slow {
                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            }
            self.details.lock().get(&uuid).cloned().ok_or(ApiError::Status {
                status: 404,
                message: "Failed to load chat room.".to_string(),
            })
        }

        async fn rename_room(&self, _uuid: String, _name: String) -> Result<ChatRoom, ApiError> {
            not_wired()
        }

        async fn delete_room(&self, _uuid: String) -> Result<(), ApiError> {
            Ok(())
        }

        async fn send_message(
            &self,
            request: SendMessageRequest,
        ) -> Result<SendMessageResponse, ApiError> {
            *self.last_send.lock() = Some(request.clone());
            let mut messages = vec![Message {
                id: Some(100),
                client_key: Some(request.client_key.clone()),
                text: request.text.clone(),
                sender: Sender::User,
                urls: request.urls.clone(),
                created_at: None,
            }];
            if let Some(reply) = self.bot_reply.lock().clone() {
                messages.push(Message {
                    id: Some(101),
                    client_key: None,
                    text: reply,
                    sender: Sender::Bot,
                    urls: vec![],
                    created_at: None,
                });
            }
            Ok(SendMessageResponse { messages })
        }

        async fn upload_attachment(
            &self,
            _file_name: String,
            _bytes: Vec<u8>,
            _mime: String,
        ) -> Result<Vec<UploadedFile>, ApiError> {
            self.upload_result.lock().clone().unwrap_or_else(not_wired)
        }

        async fn headline(&self, lang: String) -> Result<HeadlineResponse, ApiError> {
            Ok(HeadlineResponse {
                welcome_message: match lang.as_str() {
                    "he" => "ברוכים הבאים".to_string(),
                    _ => "How can I help you study today?".to_string(),
                },
                input_placeholder: "Ask anything".to_string(),
            })
        }
    }

    fn fresh_room() -> ChatRoom {
        ChatRoom {
            id: 5,
            uuid: "fresh-room".to_string(),
            name: "New Chat".to_string(),
            created_at: None,
        }
    }

    fn sample_grant() -> SessionGrant {
        SessionGrant {
            access_token: "access-1".to_string(),
            refresh_token: Some("refresh-1".to_string()),
            email_address: "alice@example.com".to_string(),
            profile: ProfileSummary {
                name: "Alice".to_string(),
            },
        }
    }

    fn test_app(service: Arc<MockService>) -> (ChatApp, SessionStore) {
        let store = SessionStore::new(Arc::new(MemoryStore::default()));
        let app = ChatApp::new(ClientConfig::default(), service, store.clone());
        (app, store)
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_send_creates_room_and_navigates() {
        let service = Arc::new(MockService::with_room(fresh_room()));
        *service.bot_reply.lock() = Some("Hi! What are we studying?".to_string());
        service.set_detail(
            "fresh-room",
            RoomDetail {
                id: 5,
                messages: vec![],
            },
        );
        let (mut app, _store) = test_app(service.clone());

        app.set_composer_text("Hello".to_string());
        app.send_message();

        // Optimistic entry appears before any network round trip completes
        {
            let st = app.state.read();
            assert_eq!(st.view, ChatView::Conversation);
            assert_eq!(st.messages.len(), 1);
            assert_eq!(st.messages[0].delivery, Delivery::Pending);
            assert!(st.is_sending);
            assert!(st.composer.text.is_empty());
        }

        assert!(app.pump_event().await); // MessageSendCompleted
        {
            let st = app.state.read();
            assert_eq!(service.create_room_calls.load(Ordering::SeqCst), 1);
            // The message was persisted against the freshly created room's id
            let sent = service.last_send.lock().clone().expect("message persisted");
            assert_eq!(sent.room, 5);
            assert_eq!(sent.text, "Hello");
            assert_eq!(st.active_room.as_ref().map(|r| r.id), Some(5));
            assert_eq!(st.rooms.len(), 1);
            assert!(!st.is_sending);
            // Confirmed user message plus the bot reply, no duplicate optimistic copy
            assert_eq!(st.messages.len(), 2);
            assert_eq!(st.messages[0].delivery, Delivery::Confirmed);
            assert_eq!(st.messages[0].message.id, Some(100));
            assert_eq!(st.messages[1].message.sender, Sender::Bot);
        }

        assert!(app.pump_event().await); // NavigateToRoom, after the delay
        assert!(app.pump_event().await); // RoomOpened
        let st = app.state.read();
        assert_eq!(st.view, ChatView::Conversation);
        assert_eq!(st.active_room.as_ref().map(|r| r.uuid.as_str()), Some("fresh-room"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_double_send_creates_one_room() {
        let service = Arc::new(MockService::with_room(fresh_room()));
        let (mut app, _store) = test_app(service.clone());

        app.set_composer_text("first".to_string());
        app.send_message();
        app.set_composer_text("second".to_string());
        app.send_message(); // gated: previous send still in flight

        assert_eq!(app.state.read().messages.len(), 1);
        assert!(app.pump_event().await);
        assert_eq!(service.create_room_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_delete_active_room_returns_to_initial_view() {
        let service = Arc::new(MockService::default());
        let (mut app, _store) = test_app(service);
        {
            let mut st = app.state.write();
            st.rooms = vec![fresh_room()];
            st.active_room = Some(crate::app::state::ActiveRoom {
                id: 5,
                uuid: "fresh-room".to_string(),
            });
            st.view = ChatView::Conversation;
        }

        app.delete_room("fresh-room".to_string());
        assert!(app.pump_event().await);

        let st = app.state.read();
        assert_eq!(st.view, ChatView::Initial);
        assert!(st.active_room.is_none());
        assert!(st.rooms.is_empty());
        assert!(st.messages.is_empty());
    }

    #[tokio::test]
    async fn test_delete_inactive_room_keeps_conversation() {
        let service = Arc::new(MockService::default());
        let (mut app, _store) = test_app(service);
        let mut other = fresh_room();
        other.uuid = "other-room".to_string();
        other.id = 6;
        {
            let mut st = app.state.write();
            st.rooms = vec![fresh_room(), other];
            st.active_room = Some(crate::app::state::ActiveRoom {
                id: 5,
                uuid: "fresh-room".to_string(),
            });
            st.view = ChatView::Conversation;
        }

        app.delete_room("other-room".to_string());
        assert!(app.pump_event().await);

        let st = app.state.read();
        assert_eq!(st.view, ChatView::Conversation);
        assert_eq!(st.rooms.len(), 1);
        assert_eq!(st.active_room.as_ref().map(|r| r.id), Some(5));
    }

    #[test]
    fn test_otp_countdown_unlocks_resend_and_clears_store() {
        let service = Arc::new(MockService::default());
        let (app, store) = test_app(service);
        {
            let mut st = app.state.write();
            st.otp = Some(crate::app::state::OtpState {
                user_id: 42,
                email: "alice@example.com".to_string(),
                remaining_secs: 120,
                resend_enabled: false,
                error: None,
            });
        }
        store.set_otp_countdown(120);

        for _ in 0..119 {
            app.tick_otp_timer();
        }
        {
            let st = app.state.read();
            let otp = st.otp.as_ref().unwrap();
            assert_eq!(otp.remaining_secs, 1);
            assert!(!otp.resend_enabled);
        }
        assert_eq!(store.otp_countdown(), Some(1));

        app.tick_otp_timer();
        {
            let st = app.state.read();
            let otp = st.otp.as_ref().unwrap();
            assert_eq!(otp.remaining_secs, 0);
            assert!(otp.resend_enabled);
        }
        assert!(store.otp_countdown().is_none());

        // Extra ticks are harmless
        app.tick_otp_timer();
        assert_eq!(app.state.read().otp.as_ref().unwrap().remaining_secs, 0);
    }

    #[tokio::test]
    async fn test_language_switch_mirrors_direction_without_touching_session() {
        let service = Arc::new(MockService::default());
        let (mut app, store) = test_app(service);
        let session = crate::services::storage::Session {
            access_token: "access-1".to_string(),
            refresh_token: None,
            email: "alice@example.com".to_string(),
            username: "Alice".to_string(),
        };
        store.save_session(&session);
        app.state.write().session = Some(session.clone());

        app.switch_language(Language::He);
        {
            let st = app.state.read();
            assert_eq!(st.direction(), crate::app::Direction::Rtl);
            assert_eq!(st.session.as_ref(), Some(&session));
        }
        assert_eq!(store.language().as_deref(), Some("he"));
        assert_eq!(store.load_session(), Some(session));

        assert!(app.pump_event().await); // HeadlineLoaded
        let st = app.state.read();
        assert_eq!(
            st.headline.as_ref().map(|h| h.welcome_message.as_str()),
            Some("ברוכים הבאים")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_room_fetch_is_discarded() {
        let service = Arc::new(MockService::default());
        service.set_detail("slow", RoomDetail { id: 1, messages: vec![] });
        service.set_detail("fast", RoomDetail { id: 2, messages: vec![] });
        *service.slow_detail_uuid.lock() = Some("slow".to_string());
        let (mut app, _store) = test_app(service);

        app.open_room("slow".to_string());
        app.open_room("fast".to_string());

        assert!(app.pump_event().await); // fast resolves first
        assert!(app.pump_event().await); // slow resolves late and is discarded

        let st = app.state.read();
        assert_eq!(st.active_room.as_ref().map(|r| r.id), Some(2));
        assert_eq!(st.view, ChatView::Conversation);
    }

    #[tokio::test]
    async fn test_push_for_inactive_room_is_dropped() {
        let service = Arc::new(MockService::default());
        let (mut app, _store) = test_app(service);
        {
            let mut st = app.state.write();
            st.active_room = Some(crate::app::state::ActiveRoom {
                id: 5,
                uuid: "fresh-room".to_string(),
            });
            st.view = ChatView::Conversation;
        }

        app.handle_event(AppEvent::MessagePushed {
            room_uuid: "some-other-room".to_string(),
            message: Message {
                id: Some(9),
                client_key: None,
                text: "late reply".to_string(),
                sender: Sender::Bot,
                urls: vec![],
                created_at: None,
            },
        });
        assert!(app.state.read().messages.is_empty());

        app.handle_event(AppEvent::MessagePushed {
            room_uuid: "fresh-room".to_string(),
            message: Message {
                id: Some(9),
                client_key: None,
                text: "on-topic reply".to_string(),
                sender: Sender::Bot,
                urls: vec![],
                created_at: None,
            },
        });
        assert_eq!(app.state.read().messages.len(), 1);
    }

    #[test]
    fn test_send_blocked_while_attachment_uploading() {
        let service = Arc::new(MockService::with_room(fresh_room()));
        let (app, _store) = test_app(service.clone());
        {
            let mut st = app.state.write();
            st.composer.text = "look at this".to_string();
            st.composer.attachments.push(Attachment {
                id: "tmp-1".to_string(),
                url: "local://tmp-1".to_string(),
                kind: AttachmentKind::Image,
                name: "photo.png".to_string(),
                uploading: true,
            });
        }

        app.send_message();

        let st = app.state.read();
        assert!(st.messages.is_empty());
        assert!(!st.is_sending);
        assert_eq!(service.create_room_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_sign_in_persists_session_and_remembered_email() {
        let service = Arc::new(MockService::default());
        service.set_grant(sample_grant());
        let (mut app, store) = test_app(service);

        app.sign_in("alice@example.com".to_string(), "Password1".to_string(), true);
        assert!(app.pump_event().await);

        {
            let st = app.state.read();
            assert!(st.is_authenticated());
            assert_eq!(st.session.as_ref().map(|s| s.username.as_str()), Some("Alice"));
        }
        assert!(store.load_session().is_some());
        assert_eq!(store.remembered_email().as_deref(), Some("alice@example.com"));

        app.sign_out();
        assert!(!app.state.read().is_authenticated());
        assert!(store.load_session().is_none());
        // Remember-me survives sign-out
        assert_eq!(store.remembered_email().as_deref(), Some("alice@example.com"));
    }

    #[tokio::test]
    async fn test_attachment_upload_replaces_placeholder_in_place() {
        let service = Arc::new(MockService::default());
        *service.upload_result.lock() = Some(Ok(vec![UploadedFile {
            file_url: "/media/uploads/photo.png".to_string(),
        }]));
        let (mut app, _store) = test_app(service);

        app.attach_file("photo.png".to_string(), vec![1, 2, 3], "image/png".to_string());
        {
            let st = app.state.read();
            assert_eq!(st.composer.attachments.len(), 1);
            assert!(st.composer.attachments[0].uploading);
            assert!(!st.send_enabled());
        }

        assert!(app.pump_event().await);
        let st = app.state.read();
        assert_eq!(st.composer.attachments.len(), 1);
        let attachment = &st.composer.attachments[0];
        assert!(!attachment.uploading);
        assert_eq!(attachment.url, "/media/uploads/photo.png");
        assert_eq!(attachment.kind, AttachmentKind::Image);
        assert!(st.send_enabled());
    }

    #[tokio::test]
    async fn test_attachment_upload_failure_removes_placeholder() {
        let service = Arc::new(MockService::default());
        *service.upload_result.lock() = Some(Err(ApiError::Status {
            status: 500,
            message: "upload failed".to_string(),
        }));
        let (mut app, _store) = test_app(service);

        app.attach_file("notes.pdf".to_string(), vec![1], "application/pdf".to_string());
        assert!(app.pump_event().await);

        let st = app.state.read();
        assert!(st.composer.attachments.is_empty());
        assert_eq!(st.composer.upload_error.as_deref(), Some("upload failed"));
        assert!(st.send_enabled());
    }

    #[tokio::test]
    async fn test_failed_room_open_keeps_prior_view() {
        let service = Arc::new(MockService::default());
        let (mut app, _store) = test_app(service);

        app.open_room("missing-room".to_string());
        assert_eq!(app.state.read().view, ChatView::Loading);

        assert!(app.pump_event().await);
        let st = app.state.read();
        assert_eq!(st.view, ChatView::Initial);
        assert!(st.messages.is_empty());
        assert_eq!(st.api_error.as_deref(), Some("Failed to load chat room."));
    }

    #[tokio::test]
    async fn test_send_failure_keeps_optimistic_entry() {
        let service = Arc::new(MockService::default()); // create_room not wired -> send fails
        let (mut app, _store) = test_app(service);

        app.set_composer_text("Hello".to_string());
        app.send_message();
        assert!(app.pump_event().await);

        let st = app.state.read();
        assert_eq!(st.messages.len(), 1);
        assert_eq!(st.messages[0].delivery, Delivery::Pending);
        assert!(!st.is_sending);
        assert!(st.api_error.is_some());
    }

    #[tokio::test]
    async fn test_signup_starts_otp_countdown() {
        let service = Arc::new(MockService::default());
        let (mut app, store) = test_app(service);

        app.sign_up(
            "Alice".to_string(),
            "alice@example.com".to_string(),
            "Password1".to_string(),
            "Password1".to_string(),
        );
        assert!(app.pump_event().await);

        let st = app.state.read();
        let otp = st.otp.as_ref().unwrap();
        assert_eq!(otp.user_id, 42);
        assert_eq!(otp.remaining_secs, 120);
        assert!(!otp.resend_enabled);
        assert_eq!(store.otp_countdown(), Some(120));
        assert_eq!(store.pending_otp(), Some((42, "alice@example.com".to_string())));
    }
}
