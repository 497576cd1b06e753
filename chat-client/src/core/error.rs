//! # Common Error Types
//!
//! Consolidated error handling for the chat client.
//!
//! Errors are categorized by their source:
//!
//! - **[`ApiError`]**: Backend communication errors (network, HTTP status,
//!   response decoding). Produced by the `services::api` layer.
//! - **[`AppError`]**: Application-level wrapper adding validation and
//!   storage failures on top of API errors.
//!
//! The API layer validates every response body against its typed schema and
//! fails fast on a mismatch, so a `Decode` error always means the server
//! broke the contract, not that the client guessed a shape wrong.

use thiserror::Error;

/// Errors produced while talking to the backend API.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Transport-level failure: DNS, connect, timeout, TLS.
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx response. `message` carries the server's error body when one
    /// was present, otherwise the canonical status reason.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// A 2xx response whose body did not match the endpoint's schema.
    #[error("failed to parse response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether this error is an HTTP 401.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401, .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

/// Application-wide error type covering all error scenarios in the client.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend API communication error.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Input validation error, blocked before any request is made.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Durable store read/write error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Application state management error.
    #[error("State error: {0}")]
    State(String),
}

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;
