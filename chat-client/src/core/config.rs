//! # Client Configuration
//!
//! Configuration loaded from environment variables with sensible defaults,
//! validated on construction to fail fast if misconfigured.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default backend origin (development server).
const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";

/// Default per-request timeout to prevent the UI from hanging on a dead
/// backend.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client configuration.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL for REST requests, without a trailing slash.
    pub api_base_url: String,

    /// Base URL for the per-room WebSocket channel (`ws://` or `wss://`),
    /// without a trailing slash.
    pub ws_base_url: String,

    /// Path of the durable session/preference file.
    pub session_file: PathBuf,

    /// Timeout applied to every REST request.
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// - `CHAT_API_BASE_URL` - REST origin (default `http://127.0.0.1:8000`)
    /// - `CHAT_WS_BASE_URL` - WebSocket origin; derived from the REST origin
    ///   when unset
    /// - `CHAT_SESSION_FILE` - durable store path (default
    ///   `./chat-session.json`)
    pub fn from_env() -> Result<Self, String> {
        let api_base_url = env::var("CHAT_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        let api_base_url = api_base_url.trim_end_matches('/').to_string();

        let ws_base_url = env::var("CHAT_WS_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| derive_ws_base_url(&api_base_url));

        let session_file = env::var("CHAT_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./chat-session.json"));

        let config = Self {
            api_base_url,
            ws_base_url,
            session_file,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(format!(
                "CHAT_API_BASE_URL must start with http:// or https://, got {}",
                self.api_base_url
            ));
        }
        if !self.ws_base_url.starts_with("ws://") && !self.ws_base_url.starts_with("wss://") {
            return Err(format!(
                "CHAT_WS_BASE_URL must start with ws:// or wss://, got {}",
                self.ws_base_url
            ));
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            ws_base_url: derive_ws_base_url(DEFAULT_API_BASE_URL),
            session_file: PathBuf::from("./chat-session.json"),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Derive the WebSocket origin from the REST origin.
fn derive_ws_base_url(api_base_url: &str) -> String {
    api_base_url
        .replace("https://", "wss://")
        .replace("http://", "ws://")
}
