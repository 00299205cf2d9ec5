//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! local TOML file ─┐
//!                  ├→ loader.rs (read/fetch & decode)
//! config center  ──┘     → fresh record
//!                        → atomic swap into SharedConfig
//!                        → readers observe new config
//!
//! On change notification (remote mode only):
//!     watcher.rs receives event from center.rs
//!     → loader.rs fetches and decodes
//!     → swap on success, keep last good config on failure
//! ```
//!
//! # Design Decisions
//! - Records are immutable once loaded; changes require a full reload
//! - Reloads replace the whole record, they never merge into the old one
//! - Connect, fetch and decode failures stay distinct error kinds

pub mod center;
pub mod duration;
pub mod error;
pub mod file_center;
pub mod loader;
pub mod schema;
pub mod shared;
pub mod watcher;

pub use center::{ConfigCenter, MemoryCenter};
pub use error::{CenterError, ConfigError, DecodeError, Stage};
pub use file_center::{FileCenter, FileCenterOptions};
pub use loader::Loader;
pub use schema::ServiceConfig;
pub use shared::SharedConfig;
pub use watcher::{ReloadWatcher, WatchState, WatcherHandle};
