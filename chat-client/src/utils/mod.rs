//! # Utility Functions
//!
//! - `logging`: Console logging initialization
//! - `time`: Timestamp formatting for messages, rooms, and countdowns
//! - `validation`: Client-side input validation for auth forms

pub mod logging;
pub mod time;
pub mod validation;
