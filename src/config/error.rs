//! Error types for configuration loading.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a config center client.
#[derive(Debug, Error)]
pub enum CenterError {
    /// The config center could not be reached.
    #[error("config center unreachable: {0}")]
    Unreachable(String),

    /// The change-notification source could not be set up.
    #[error("config center watch failed: {0}")]
    Watch(#[from] notify::Error),
}

/// Errors turning TOML text into a configuration record.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The config file is missing or unreadable.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The text is not valid TOML or does not match the record's shape.
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Could not connect to the config center.
    #[error("connect: {0}")]
    Connection(#[from] CenterError),

    /// The config center is reachable but has no data.
    #[error("fetch: config center returned no data")]
    Fetch,

    /// Configuration text was present but could not be decoded.
    #[error("decode: {0}")]
    Decode(#[from] DecodeError),
}

impl ConfigError {
    /// The loading stage that failed.
    pub fn stage(&self) -> Stage {
        match self {
            ConfigError::Connection(_) => Stage::Connect,
            ConfigError::Fetch => Stage::Fetch,
            ConfigError::Decode(_) => Stage::Decode,
        }
    }
}

/// Loading stage, used to label errors in logs and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Connect,
    Fetch,
    Decode,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Connect => "connect",
            Stage::Fetch => "fetch",
            Stage::Decode => "decode",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
