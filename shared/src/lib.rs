//! # Shared Data Transfer Objects Library
//!
//! This library defines the contract between the chat client and the backend
//! API. All DTOs use JSON serialization via `serde` for API communication.
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects for API communication
//!   - **[`dto::auth`]**: Authentication, OTP, and profile DTOs
//!   - **[`dto::chat`]**: Chat room, message, and attachment DTOs
//!   - **[`dto::headline`]**: Localized welcome text DTOs
//! - **[`utils`]**: Shared utility functions
//!   - **[`utils::clean_message_text`]**: Strip markdown artifacts from bot replies
//!
//! ## Wire Format
//!
//! All DTOs serialize to JSON using the default `serde` behavior:
//! - Field names use **snake_case** in Rust, which maps to **snake_case** in JSON by default
//! - Optional fields are omitted from JSON when `None` (using `#[serde(skip_serializing_if = "Option::is_none")]`)
//! - All structs implement both `Serialize` and `Deserialize` for bidirectional communication

pub mod dto;
pub mod utils;

// Re-export commonly used types for convenience
// Note: Wildcard re-exports are used here since shared is a DTO library
// where all exports are meant to be public API
pub use dto::*;
pub use utils::*;
