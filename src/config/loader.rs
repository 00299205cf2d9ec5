//! Configuration loading from disk or a config center.
//!
//! Every load decodes into a fresh record and only then swaps it into the
//! shared handle. A failed load leaves the current record in place, and a
//! successful one replaces it wholesale: fields missing from the new text
//! take their defaults instead of keeping previous values.

use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::config::center::ConfigCenter;
use crate::config::error::{ConfigError, DecodeError};
use crate::config::shared::SharedConfig;
use crate::observability::metrics;

/// Decode TOML text into a record.
pub fn decode<T: DeserializeOwned>(text: &str) -> Result<T, DecodeError> {
    Ok(toml::from_str(text)?)
}

/// Read and decode a TOML file.
pub fn read_file<T: DeserializeOwned>(path: &Path) -> Result<T, DecodeError> {
    let text = fs::read_to_string(path).map_err(|source| DecodeError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    decode(&text)
}

/// Fetch the current text from a config center and decode it.
pub fn fetch<T: DeserializeOwned, C: ConfigCenter + ?Sized>(center: &C) -> Result<T, ConfigError> {
    let text = center.fetch().ok_or(ConfigError::Fetch)?;
    Ok(decode(&text)?)
}

/// Loads configuration and publishes it through a [`SharedConfig`].
pub struct Loader<T> {
    shared: SharedConfig<T>,
}

impl<T> Loader<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    /// Create a loader that publishes into `shared`.
    pub fn new(shared: SharedConfig<T>) -> Self {
        Self { shared }
    }

    /// The handle this loader writes to.
    pub fn shared(&self) -> &SharedConfig<T> {
        &self.shared
    }

    /// Load from a local file and swap it in.
    pub fn load_file(&self, path: &Path) -> Result<Arc<T>, ConfigError> {
        let result = read_file(path).map_err(ConfigError::from);
        self.publish("local", result)
    }

    /// Fetch from a config center and swap it in.
    pub fn load_remote<C: ConfigCenter + ?Sized>(&self, center: &C) -> Result<Arc<T>, ConfigError> {
        let result = fetch(center);
        self.publish("remote", result)
    }

    fn publish(&self, source: &'static str, result: Result<T, ConfigError>) -> Result<Arc<T>, ConfigError> {
        match result {
            Ok(config) => {
                self.shared.store(config);
                metrics::record_load(source, None);
                tracing::debug!(source, "Configuration loaded");
                Ok(self.shared.load())
            }
            Err(e) => {
                metrics::record_load(source, Some(e.stage()));
                Err(e)
            }
        }
    }
}

impl<T> Clone for Loader<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}
