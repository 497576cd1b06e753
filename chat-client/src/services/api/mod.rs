//! # Backend API Client
//!
//! HTTP and WebSocket communication with the chat backend, organized by
//! endpoint domain:
//!
//! - [`client`] - The [`ApiClient`] itself: bearer injection, the
//!   single-retry 401 token-refresh flow, and response decoding
//! - [`auth`] - Sign-in, sign-up, OTP, password reset, profile
//! - [`rooms`] - Chat room directory CRUD
//! - [`messages`] - Message persistence
//! - [`attachments`] - Multipart file upload
//! - [`headline`] - Localized welcome text
//! - [`websocket`] - Room-scoped push subscription

pub mod attachments;
pub mod auth;
pub mod client;
pub mod headline;
pub mod messages;
pub mod rooms;
pub mod websocket;

pub use client::ApiClient;
pub use websocket::RoomSubscription;
