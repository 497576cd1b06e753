//! # Core Module
//!
//! Cross-cutting concerns shared by the service and app layers: the error
//! taxonomy, client configuration, and the service trait used for
//! dependency injection.

pub mod config;
pub mod error;
pub mod service;

pub use config::ClientConfig;
pub use error::{ApiError, AppError};
pub use service::ChatService;
