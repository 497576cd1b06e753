//! # Settings Handlers
//!
//! Language switching and localized headline refresh.

use std::sync::Arc;

use async_channel::Sender;
use parking_lot::RwLock;

use crate::app::events::AppEvent;
use crate::app::state::{AppState, Language};
use crate::core::service::ChatService;
use crate::services::storage::SessionStore;

/// Switch the UI language.
///
/// Persists the preference, flips the state's language (and with it the
/// layout direction), and refetches the localized headline. Session state
/// is not touched.
pub(crate) fn handle_switch_language(
    state: Arc<RwLock<AppState>>,
    session: &SessionStore,
    api: Arc<dyn ChatService>,
    event_tx: Sender<AppEvent>,
    language: Language,
) {
    session.set_language(language.code());
    {
        let mut st = state.write();
        if st.language == language {
            return;
        }
        st.language = language;
    }
    tracing::info!(language = language.code(), "Switched UI language");
    handle_refresh_headline(state, api, event_tx);
}

/// Refetch the welcome message and input placeholder for the current
/// language.
pub(crate) fn handle_refresh_headline(
    state: Arc<RwLock<AppState>>,
    api: Arc<dyn ChatService>,
    event_tx: Sender<AppEvent>,
) {
    let lang = state.read().language.code().to_string();
    tokio::spawn(async move {
        let result = api.headline(lang).await;
        let _ = event_tx.send(AppEvent::HeadlineLoaded(result)).await;
    });
}
