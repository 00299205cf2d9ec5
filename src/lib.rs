//! Service configuration loading with hot reload.
//!
//! Configuration is read from a local TOML file, or fetched from a config
//! center and reloaded whenever the center reports a change. The current
//! record is published through a [`SharedConfig`] that readers can load at
//! any time without ever seeing a half-applied reload.

pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::{ConfigError, SharedConfig, ServiceConfig};
pub use lifecycle::Shutdown;
