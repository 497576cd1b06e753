//! # Study-Assistant Chatbot Client - Library Root
//!
//! Client SDK for a bilingual (English/Hebrew) study-assistant chatbot
//! service. This crate owns everything between the rendering layer and the
//! backend: authentication flows, the chat-room directory, the conversation
//! controller with optimistic sends and real-time replies, attachment
//! uploads, and localized welcome text.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │              chat-client (this crate)                  │
//! ├────────────────────────────────────────────────────────┤
//! │  Tokio             - Async runtime                     │
//! │  Reqwest           - HTTP client (bearer + refresh)    │
//! │  tokio-tungstenite - Per-room WebSocket subscription   │
//! │  async-channel     - Background task -> app events     │
//! │  parking_lot       - Shared state lock                 │
//! └────────────────────────────────────────────────────────┘
//!          │ HTTP                         │ WebSocket
//!          ▼                              ▼
//! ┌─────────────────┐          ┌─────────────────────────┐
//! │  Backend API    │          │   /ws/chat/{uuid}/      │
//! │  (REST, JSON)   │          │   (server -> client)    │
//! └─────────────────┘          └─────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - **app**: Application state and the conversation state machine
//!   - Event-driven architecture with async tasks
//!   - Optimistic send + reconciliation by client key
//! - **services**: External integrations
//!   - `api`: Backend HTTP client (auth, rooms, messages, attachments, headline)
//!   - `api::websocket`: Room-scoped push subscription
//!   - `storage`: Durable session tokens and UI preferences
//! - **core**: Error type, configuration, and the [`core::service::ChatService`]
//!   trait used for dependency injection
//! - **utils**: Input validation helpers
//!
//! ## Core Concepts
//!
//! ### Event-Driven Architecture
//!
//! UI actions call handler methods on [`app::ChatApp`]; network work runs on
//! `tokio::spawn`ed tasks that report back through an `async_channel`. The
//! embedding UI drains those events via [`app::ChatApp::handle_event`] on its
//! own loop, so all shared state mutation happens in one place.

pub mod app;
pub mod core;
pub mod services;
pub mod utils;
