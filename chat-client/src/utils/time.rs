//! # Time Utilities
//!
//! Time formatting helpers for rendering message and room timestamps.

use chrono::{DateTime, Utc};

/// Format a message timestamp for in-conversation display (24h clock).
pub fn format_message_time(time: &DateTime<Utc>) -> String {
    time.format("%H:%M").to_string()
}

/// Format a room creation date for the sidebar.
pub fn format_room_date(time: &DateTime<Utc>) -> String {
    time.format("%b %d, %Y").to_string()
}

/// Format an OTP countdown as MM:SS.
pub fn format_countdown(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
