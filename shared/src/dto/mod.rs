//! # Data Transfer Objects (DTOs)
//!
//! This module contains all data structures used for communication between
//! the chat client and the backend via the REST API and the per-room
//! WebSocket push channel.
//!
//! ## Module Organization
//!
//! - [`auth`] - Sign-in, sign-up, OTP, password reset, and profile DTOs
//! - [`chat`] - Chat rooms, messages, and attachment uploads
//! - [`headline`] - Localized welcome message and input placeholder
//!
//! ## Serialization Format
//!
//! All DTOs use `serde_json` for JSON serialization:
//!
//! - **Field naming**: snake_case (default serde behavior)
//! - **Optional fields**: Omitted when `None` using `#[serde(skip_serializing_if = "Option::is_none")]`
//! - **Enums**: Serialize to lowercase strings using `#[serde(rename_all = "lowercase")]`
//! - **All types**: Implement both `Serialize` and `Deserialize`

pub mod auth;
pub mod chat;
pub mod headline;

pub use auth::*;
pub use chat::*;
pub use headline::*;
