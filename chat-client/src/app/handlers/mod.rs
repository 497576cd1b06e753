//! # Action Handlers
//!
//! Handler functions for UI actions. Each validates input, mutates state
//! under the lock, and spawns background work that reports back through the
//! event channel.

pub mod attachments;
pub mod auth;
pub mod chat;
pub mod rooms;
pub mod settings;
