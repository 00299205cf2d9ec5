//! Structured logging.
//!
//! `RUST_LOG` wins when set; otherwise the directive passed by the caller
//! (from `--log-level`) is used.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber.
pub fn init_logging(default_directive: &str) -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive.into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}
