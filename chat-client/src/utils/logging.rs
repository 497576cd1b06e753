//! # Logging Initialization
//!
//! Console logging setup for embedding applications and tests. The filter
//! comes from `RUST_LOG` when set, falling back to `chat_client=info,warn`.

use tracing_subscriber::EnvFilter;

/// Initialize the logging system.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("chat_client=info,warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init();
}
