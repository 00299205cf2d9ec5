//! File-backed config center.
//!
//! Serves configuration from a TOML file on a shared mount that a deploy
//! pipeline writes to. Change notifications come from filesystem events.
//!
//! The parent directory is watched rather than the file itself so that
//! editors and deploy tools that replace the file (write + rename) keep
//! producing events.

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::broadcast;

use crate::config::center::{ConfigCenter, EVENT_CAPACITY};
use crate::config::error::CenterError;

/// Connection options for [`FileCenter`].
#[derive(Debug, Clone)]
pub struct FileCenterOptions {
    /// Path of the published configuration file.
    pub path: PathBuf,
    /// Poll interval for platforms without native file events.
    pub poll_interval: Duration,
}

impl FileCenterOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            poll_interval: Duration::from_secs(2),
        }
    }
}

/// A config center backed by a single file.
pub struct FileCenter {
    path: PathBuf,
    events: broadcast::Sender<()>,
    // Dropping the watcher stops event delivery.
    _watcher: Mutex<RecommendedWatcher>,
}

impl FileCenter {
    /// Connect to the center, starting the file watcher.
    ///
    /// Fails with [`CenterError::Unreachable`] if the directory holding the
    /// file does not exist. The file itself may be absent; `fetch` then
    /// reports no data.
    pub fn connect(options: FileCenterOptions) -> Result<Self, CenterError> {
        let path = options.path;
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !dir.is_dir() {
            return Err(CenterError::Unreachable(format!(
                "{} is not a directory",
                dir.display()
            )));
        }

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let tx = events.clone();
        let file_name = path.file_name().map(|n| n.to_os_string());

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    let relevant = event.kind.is_modify()
                        || event.kind.is_create()
                        || event.kind.is_remove();
                    let ours = event
                        .paths
                        .iter()
                        .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
                    if relevant && ours {
                        tracing::debug!(kind = ?event.kind, "config center file changed");
                        let _ = tx.send(());
                    }
                }
                Err(e) => tracing::error!("Config center watch error: {:?}", e),
            },
            Config::default().with_poll_interval(options.poll_interval),
        )?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?path, "Connected to file config center");
        Ok(Self {
            path,
            events,
            _watcher: Mutex::new(watcher),
        })
    }

    /// Path of the published configuration file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigCenter for FileCenter {
    fn fetch(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(text) if !text.trim().is_empty() => Some(text),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(path = ?self.path, error = %e, "config center file unreadable");
                None
            }
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<()> {
        self.events.subscribe()
    }
}
