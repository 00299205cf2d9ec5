//! Startup orchestration.
//!
//! # Responsibilities
//! - Select local or remote mode from the `--conf` flag
//! - Run the first load synchronously; any error is returned to the caller
//! - Remote mode: start the reload watcher once the first load succeeded

use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::center::ConfigCenter;
use crate::config::error::{CenterError, ConfigError};
use crate::config::loader::Loader;
use crate::config::shared::SharedConfig;
use crate::config::watcher::{ReloadWatcher, WatcherHandle};
use crate::lifecycle::shutdown::Shutdown;

/// Where configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// A local TOML file.
    Local(PathBuf),
    /// A config center, kept in sync by the reload watcher.
    Remote,
}

impl Mode {
    /// A non-empty path selects local mode; an empty one selects remote mode.
    pub fn from_flag(conf_path: &str) -> Self {
        if conf_path.is_empty() {
            Mode::Remote
        } else {
            Mode::Local(PathBuf::from(conf_path))
        }
    }
}

/// Result of a successful startup.
pub struct Started<T> {
    pub shared: SharedConfig<T>,
    pub mode: Mode,
    /// Running watcher, remote mode only.
    pub watcher: Option<WatcherHandle>,
}

/// Load the initial configuration into `shared`.
///
/// `connect` is only called in remote mode. The watcher subscribes to
/// `shutdown` and must be started inside a Tokio runtime.
pub fn init<T, C, F>(
    shared: SharedConfig<T>,
    conf_path: &str,
    connect: F,
    shutdown: &Shutdown,
) -> Result<Started<T>, ConfigError>
where
    T: DeserializeOwned + Send + Sync + 'static,
    C: ConfigCenter,
    F: FnOnce() -> Result<C, CenterError>,
{
    let mode = Mode::from_flag(conf_path);
    let loader = Loader::new(shared.clone());

    let watcher = match &mode {
        Mode::Local(path) => {
            loader.load_file(path).inspect_err(|e| {
                tracing::error!(path = ?path, stage = %e.stage(), error = %e, "Failed to load local configuration");
            })?;
            tracing::info!(path = ?path, "Configuration loaded from local file");
            None
        }
        Mode::Remote => {
            let center = Arc::new(connect().map_err(|e| {
                tracing::error!(error = %e, "Failed to connect to config center");
                ConfigError::from(e)
            })?);
            let watcher = ReloadWatcher::new(loader.clone(), Arc::clone(&center));
            loader.load_remote(center.as_ref()).inspect_err(|e| {
                tracing::error!(stage = %e.stage(), error = %e, "Failed to load configuration from config center");
            })?;
            tracing::info!("Configuration loaded from config center");
            Some(watcher.spawn(shutdown.subscribe()))
        }
    };

    Ok(Started {
        shared,
        mode,
        watcher,
    })
}
