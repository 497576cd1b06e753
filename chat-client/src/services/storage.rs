//! # Durable Client Storage
//!
//! Persists session tokens and UI preferences across restarts, the way the
//! browser build of this product kept them in cookies and local storage.
//!
//! [`PrefStore`] is the flat key/value substrate; [`FileStore`] backs it
//! with a JSON file, [`MemoryStore`] backs tests. [`SessionStore`] layers
//! the typed accessors on top: the signed-in session, UI language, the OTP
//! resend countdown, and the pending OTP/reset bookkeeping.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

// Keys match the original browser client's cookie/local-storage names so a
// stored file stays readable across ports of the UI.
const KEY_ACCESS_TOKEN: &str = "authToken";
const KEY_REFRESH_TOKEN: &str = "refreshToken";
const KEY_AUTH_EMAIL: &str = "authemail";
const KEY_USERNAME: &str = "username";
const KEY_APP_LANGUAGE: &str = "appLanguage";
const KEY_OTP_TIMER: &str = "otp_timer";
const KEY_OTP_USER_ID: &str = "otp_user_id";
const KEY_OTP_EMAIL: &str = "otp_email";
const KEY_RESET_USER_ID: &str = "reset_user_id";
const KEY_RESET_SECRET_KEY: &str = "reset_secret_key";
const KEY_REMEMBERED_EMAIL: &str = "remembered_email";

/// A signed-in session as persisted in durable storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub email: String,
    pub username: String,
}

/// Flat string key/value store.
pub trait PrefStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    values: RwLock<BTreeMap<String, String>>,
}

impl PrefStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values.write().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values.write().remove(key);
    }
}

/// JSON-file-backed store.
///
/// The whole map is rewritten on every mutation. That is plenty for a
/// handful of short keys, and keeps the file human-readable.
pub struct FileStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open a store at `path`, loading existing values if the file exists.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(values) => values,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Corrupt session file, starting empty");
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        Self {
            path,
            values: RwLock::new(values),
        }
    }

    fn flush(&self, values: &BTreeMap<String, String>) {
        match serde_json::to_string_pretty(values) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&self.path, json) {
                    tracing::error!(path = %self.path.display(), error = %e, "Failed to write session file");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize session file");
            }
        }
    }
}

impl PrefStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut values = self.values.write();
        values.insert(key.to_string(), value.to_string());
        self.flush(&values);
    }

    fn remove(&self, key: &str) {
        let mut values = self.values.write();
        if values.remove(key).is_some() {
            self.flush(&values);
        }
    }
}

/// Typed accessors over a [`PrefStore`].
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn PrefStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn PrefStore>) -> Self {
        Self { store }
    }

    // -- session tokens and identity

    /// Persist a full session (on sign-in or OTP verification).
    pub fn save_session(&self, session: &Session) {
        self.store.set(KEY_ACCESS_TOKEN, &session.access_token);
        match &session.refresh_token {
            Some(token) => self.store.set(KEY_REFRESH_TOKEN, token),
            None => self.store.remove(KEY_REFRESH_TOKEN),
        }
        self.store.set(KEY_AUTH_EMAIL, &session.email);
        self.store.set(KEY_USERNAME, &session.username);
    }

    /// Restore a persisted session, if one exists.
    pub fn load_session(&self) -> Option<Session> {
        Some(Session {
            access_token: self.store.get(KEY_ACCESS_TOKEN)?,
            refresh_token: self.store.get(KEY_REFRESH_TOKEN),
            email: self.store.get(KEY_AUTH_EMAIL)?,
            username: self.store.get(KEY_USERNAME)?,
        })
    }

    /// Drop all session material (logout, failed refresh).
    pub fn clear_session(&self) {
        self.store.remove(KEY_ACCESS_TOKEN);
        self.store.remove(KEY_REFRESH_TOKEN);
        self.store.remove(KEY_AUTH_EMAIL);
        self.store.remove(KEY_USERNAME);
    }

    pub fn access_token(&self) -> Option<String> {
        self.store.get(KEY_ACCESS_TOKEN)
    }

    pub fn set_access_token(&self, token: &str) {
        self.store.set(KEY_ACCESS_TOKEN, token);
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.store.get(KEY_REFRESH_TOKEN)
    }

    /// Drop both tokens, leaving other preferences intact.
    pub fn clear_tokens(&self) {
        self.store.remove(KEY_ACCESS_TOKEN);
        self.store.remove(KEY_REFRESH_TOKEN);
    }

    // -- UI preferences

    pub fn language(&self) -> Option<String> {
        self.store.get(KEY_APP_LANGUAGE)
    }

    pub fn set_language(&self, code: &str) {
        self.store.set(KEY_APP_LANGUAGE, code);
    }

    pub fn remembered_email(&self) -> Option<String> {
        self.store.get(KEY_REMEMBERED_EMAIL)
    }

    pub fn set_remembered_email(&self, email: &str) {
        self.store.set(KEY_REMEMBERED_EMAIL, email);
    }

    pub fn clear_remembered_email(&self) {
        self.store.remove(KEY_REMEMBERED_EMAIL);
    }

    // -- OTP verification bookkeeping

    pub fn otp_countdown(&self) -> Option<u32> {
        self.store.get(KEY_OTP_TIMER)?.parse().ok()
    }

    pub fn set_otp_countdown(&self, seconds: u32) {
        self.store.set(KEY_OTP_TIMER, &seconds.to_string());
    }

    pub fn clear_otp_countdown(&self) {
        self.store.remove(KEY_OTP_TIMER);
    }

    pub fn pending_otp(&self) -> Option<(i64, String)> {
        let user_id = self.store.get(KEY_OTP_USER_ID)?.parse().ok()?;
        let email = self.store.get(KEY_OTP_EMAIL)?;
        Some((user_id, email))
    }

    pub fn set_pending_otp(&self, user_id: i64, email: &str) {
        self.store.set(KEY_OTP_USER_ID, &user_id.to_string());
        self.store.set(KEY_OTP_EMAIL, email);
    }

    pub fn clear_pending_otp(&self) {
        self.store.remove(KEY_OTP_USER_ID);
        self.store.remove(KEY_OTP_EMAIL);
        self.store.remove(KEY_OTP_TIMER);
    }

    // -- password reset bookkeeping

    pub fn reset_credentials(&self) -> Option<(i64, String)> {
        let user_id = self.store.get(KEY_RESET_USER_ID)?.parse().ok()?;
        let secret_key = self.store.get(KEY_RESET_SECRET_KEY)?;
        Some((user_id, secret_key))
    }

    pub fn set_reset_user_id(&self, user_id: i64) {
        self.store.set(KEY_RESET_USER_ID, &user_id.to_string());
    }

    pub fn set_reset_secret_key(&self, secret_key: &str) {
        self.store.set(KEY_RESET_SECRET_KEY, secret_key);
    }

    pub fn clear_reset_credentials(&self) {
        self.store.remove(KEY_RESET_USER_ID);
        self.store.remove(KEY_RESET_SECRET_KEY);
        self.store.remove(KEY_OTP_EMAIL);
    }
}
