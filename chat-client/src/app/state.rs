//! # Application State Types
//!
//! All state-related types for the client: the conversation view state
//! machine, message delivery tracking, the composer with its attachments,
//! language/direction, and OTP countdown state.

use std::time::{Duration, Instant};

use shared::dto::auth::UserProfile;
use shared::dto::chat::{AttachmentKind, ChatRoom, Message};
use shared::dto::headline::HeadlineResponse;

use crate::services::storage::Session;

/// Delay before a requested scroll-to-bottom fires, so layout can settle.
pub const SCROLL_DEBOUNCE: Duration = Duration::from_millis(100);

/// Conversation view state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatView {
    /// No room selected, no messages; the welcome headline is shown
    Initial,
    /// Room fetch in flight
    Loading,
    /// Messages displayed; sending gated by `is_sending`
    Conversation,
}

/// Delivery status of a message entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Rendered locally, not yet confirmed by the server
    Pending,
    /// Confirmed by the send response or the push channel
    Confirmed,
}

/// One entry in the conversation list
#[derive(Debug, Clone, PartialEq)]
pub struct MessageEntry {
    pub message: Message,
    pub delivery: Delivery,
}

/// The currently open room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveRoom {
    /// Numeric id, required by the message-persist endpoint
    pub id: i64,
    /// Public identifier, used for navigation and the push channel
    pub uuid: String,
}

/// A composer attachment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Client-assigned temp id; stable across the placeholder -> uploaded swap
    pub id: String,
    /// Local placeholder URL until upload completes, then the server URL
    pub url: String,
    pub kind: AttachmentKind,
    pub name: String,
    pub uploading: bool,
}

/// Message composer state
#[derive(Debug, Clone, Default)]
pub struct ComposerState {
    pub text: String,
    pub attachments: Vec<Attachment>,
    pub upload_error: Option<String>,
}

impl ComposerState {
    /// Whether any attachment is still mid-upload. Gates sending.
    pub fn has_uploading(&self) -> bool {
        self.attachments.iter().any(|a| a.uploading)
    }

    /// Whether there is anything to send at all.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.attachments.is_empty()
    }
}

/// Layout direction derived from the UI language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ltr,
    Rtl,
}

/// UI language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    En,
    He,
}

impl Language {
    /// Wire code used by the headline and message endpoints.
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::He => "he",
        }
    }

    /// Parse a stored language code, defaulting to English.
    pub fn from_code(code: &str) -> Self {
        match code {
            "he" => Language::He,
            _ => Language::En,
        }
    }

    /// Layout direction for this language.
    pub fn direction(&self) -> Direction {
        match self {
            Language::En => Direction::Ltr,
            Language::He => Direction::Rtl,
        }
    }
}

/// OTP verification countdown state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpState {
    /// Pending user awaiting verification
    pub user_id: i64,
    /// Email the OTP was sent to
    pub email: String,
    /// Seconds until resend unlocks
    pub remaining_secs: u32,
    /// Resend control enabled once the countdown hits zero
    pub resend_enabled: bool,
    /// Surfaced OTP error, if any
    pub error: Option<String>,
}

/// Global application state
///
/// Mutated only from handlers and event processing while holding the
/// state lock; background tasks never touch it directly.
pub struct AppState {
    /// Conversation view state machine
    pub view: ChatView,
    /// Signed-in session, mirroring durable storage
    pub session: Option<Session>,
    /// Sidebar room list
    pub rooms: Vec<ChatRoom>,
    /// Room list fetch in flight
    pub rooms_loading: bool,
    /// Currently open room, once its numeric id is known
    pub active_room: Option<ActiveRoom>,
    /// Bumped on every navigation; stale room fetches are discarded
    pub room_generation: u64,
    /// Conversation message list, append-only plus in-place reconciliation
    pub messages: Vec<MessageEntry>,
    /// Message composer
    pub composer: ComposerState,
    /// A send is in flight; blocks further sends
    pub is_sending: bool,
    /// A room creation is in flight; blocks a second creation
    pub room_creation_in_flight: bool,
    /// Dismissible API error
    pub api_error: Option<String>,
    /// UI language
    pub language: Language,
    /// Localized welcome text and input placeholder
    pub headline: Option<HeadlineResponse>,
    /// OTP verification in progress (signup or password reset)
    pub otp: Option<OtpState>,
    /// Signed-in user's profile, when fetched
    pub profile: Option<UserProfile>,
    /// Debounced scroll-to-bottom request
    scroll_deadline: Option<Instant>,
}

impl AppState {
    pub fn new(language: Language, session: Option<Session>) -> Self {
        Self {
            view: ChatView::Initial,
            session,
            rooms: Vec::new(),
            rooms_loading: false,
            active_room: None,
            room_generation: 0,
            messages: Vec::new(),
            composer: ComposerState::default(),
            is_sending: false,
            room_creation_in_flight: false,
            api_error: None,
            language,
            headline: None,
            otp: None,
            profile: None,
            scroll_deadline: None,
        }
    }

    /// Check if a session is established.
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Whether the send control is enabled right now.
    pub fn send_enabled(&self) -> bool {
        !self.is_sending && !self.composer.has_uploading()
    }

    /// Layout direction for the current language.
    pub fn direction(&self) -> Direction {
        self.language.direction()
    }

    /// Append an optimistic user message awaiting confirmation.
    pub fn push_optimistic(&mut self, message: Message) {
        self.messages.push(MessageEntry {
            message,
            delivery: Delivery::Pending,
        });
        self.request_scroll(Instant::now());
    }

    /// Fold a server-confirmed message into the list.
    ///
    /// Matches by `client_key` first: a pending optimistic entry with the
    /// same key is replaced in place, so the send response and the push
    /// channel can race in either order without duplicating the message.
    /// A message whose id is already present is dropped. Everything else
    /// appends.
    pub fn reconcile_message(&mut self, incoming: Message) {
        if let Some(key) = incoming.client_key.as_deref() {
            if let Some(entry) = self
                .messages
                .iter_mut()
                .find(|e| e.message.client_key.as_deref() == Some(key))
            {
                entry.message = incoming;
                entry.delivery = Delivery::Confirmed;
                self.request_scroll(Instant::now());
                return;
            }
        }

        if let Some(id) = incoming.id {
            if self.messages.iter().any(|e| e.message.id == Some(id)) {
                return;
            }
        }

        self.messages.push(MessageEntry {
            message: incoming,
            delivery: Delivery::Confirmed,
        });
        self.request_scroll(Instant::now());
    }

    /// Reset to the room-less view.
    pub fn clear_conversation(&mut self) {
        self.view = ChatView::Initial;
        self.active_room = None;
        self.messages.clear();
        self.is_sending = false;
    }

    /// Arm the debounced scroll-to-bottom request.
    pub fn request_scroll(&mut self, now: Instant) {
        self.scroll_deadline = Some(now + SCROLL_DEBOUNCE);
    }

    /// Drain the scroll request once its debounce delay has elapsed.
    ///
    /// The embedding UI polls this on its frame loop and scrolls the
    /// conversation to the bottom when it returns `true`.
    pub fn take_scroll_request(&mut self, now: Instant) -> bool {
        match self.scroll_deadline {
            Some(deadline) if now >= deadline => {
                self.scroll_deadline = None;
                true
            }
            _ => false,
        }
    }
}
