//! Config center watcher for hot reload.
//!
//! # States
//! ```text
//! Idle → Watching: spawn() after the first successful load
//! Watching → Stopped: shutdown triggered, or the center closed its events
//! ```
//!
//! While watching, each wake-up runs one fetch-decode-swap to completion
//! before the next notification is received. Notifications already queued
//! (or dropped because the receiver lagged) when a reload starts are folded
//! into that reload, since it fetches the latest payload anyway. A failed
//! reload is logged and the last good configuration stays active until the
//! next notification.
//!
//! `ConfigCenter::fetch` may block, so each reload runs on Tokio's blocking
//! pool and is awaited before the loop continues.

use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::{RecvError, TryRecvError}};
use tokio::task::JoinHandle;

use crate::config::center::ConfigCenter;
use crate::config::loader::Loader;

/// Watcher lifecycle state.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Idle = 0,
    Watching = 1,
    Stopped = 2,
}

impl From<u8> for WatchState {
    fn from(val: u8) -> Self {
        match val {
            1 => WatchState::Watching,
            2 => WatchState::Stopped,
            _ => WatchState::Idle,
        }
    }
}

#[derive(Debug, Default)]
struct Progress {
    state: AtomicU8,
    reloads: AtomicU64,
    failures: AtomicU64,
}

impl Progress {
    fn set_state(&self, state: WatchState) {
        self.state.store(state as u8, Ordering::Release);
    }
}

/// Reloads configuration whenever the config center reports a change.
pub struct ReloadWatcher<T, C> {
    loader: Loader<T>,
    center: Arc<C>,
    events: broadcast::Receiver<()>,
    progress: Arc<Progress>,
}

impl<T, C> ReloadWatcher<T, C>
where
    T: DeserializeOwned + Send + Sync + 'static,
    C: ConfigCenter,
{
    /// Create an idle watcher.
    ///
    /// Subscribes to the center immediately, so notifications published
    /// between now and [`spawn`](Self::spawn) are not lost.
    pub fn new(loader: Loader<T>, center: Arc<C>) -> Self {
        let events = center.subscribe();
        Self {
            loader,
            center,
            events,
            progress: Arc::new(Progress::default()),
        }
    }

    /// Current state.
    pub fn state(&self) -> WatchState {
        WatchState::from(self.progress.state.load(Ordering::Acquire))
    }

    /// Start the background reload loop.
    ///
    /// `shutdown` stops the loop when it fires. If its sender is dropped
    /// without firing, the loop keeps running.
    pub fn spawn(self, shutdown: broadcast::Receiver<()>) -> WatcherHandle {
        let progress = Arc::clone(&self.progress);
        progress.set_state(WatchState::Watching);
        tracing::info!("Config reload watcher started");

        let task = tokio::spawn(self.run(shutdown));
        WatcherHandle { progress, task }
    }

    async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        loop {
            tokio::select! {
                _ = stopped(&mut shutdown) => {
                    tracing::info!("Config reload watcher stopping");
                    break;
                }
                event = self.events.recv() => match event {
                    Ok(()) | Err(RecvError::Lagged(_)) => {
                        let coalesced = self.drain_pending();
                        if let Err(RecvError::Lagged(skipped)) = event {
                            tracing::debug!(skipped, "Change notifications dropped while lagging");
                        }
                        if coalesced > 0 {
                            tracing::debug!(coalesced, "Coalescing queued change notifications");
                        }
                        self.reload().await;
                    }
                    Err(RecvError::Closed) => {
                        tracing::warn!("Config center closed its event stream, stopping watcher");
                        break;
                    }
                },
            }
        }
        self.progress.set_state(WatchState::Stopped);
    }

    /// Consume notifications that are already queued.
    fn drain_pending(&mut self) -> usize {
        let mut drained = 0;
        loop {
            match self.events.try_recv() {
                Ok(()) | Err(TryRecvError::Lagged(_)) => drained += 1,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return drained,
            }
        }
    }

    async fn reload(&self) {
        tracing::info!("config reload");
        let loader = self.loader.clone();
        let center = Arc::clone(&self.center);
        let result = tokio::task::spawn_blocking(move || loader.load_remote(center.as_ref())).await;

        match result {
            Ok(Ok(_)) => {
                self.progress.reloads.fetch_add(1, Ordering::AcqRel);
            }
            Ok(Err(e)) => {
                self.progress.failures.fetch_add(1, Ordering::AcqRel);
                tracing::error!(
                    stage = %e.stage(),
                    error = %e,
                    "Config reload failed. Keeping current configuration."
                );
            }
            Err(e) => {
                self.progress.failures.fetch_add(1, Ordering::AcqRel);
                tracing::error!(error = %e, "Config reload task panicked. Keeping current configuration.");
            }
        }
    }
}

/// Resolves once shutdown fires. Never resolves if the sender is gone.
async fn stopped(shutdown: &mut broadcast::Receiver<()>) {
    match shutdown.recv().await {
        Ok(()) | Err(RecvError::Lagged(_)) => {}
        Err(RecvError::Closed) => std::future::pending::<()>().await,
    }
}

/// Handle to a running watcher.
pub struct WatcherHandle {
    progress: Arc<Progress>,
    task: JoinHandle<()>,
}

impl WatcherHandle {
    pub fn state(&self) -> WatchState {
        WatchState::from(self.progress.state.load(Ordering::Acquire))
    }

    /// Number of successful reloads.
    pub fn reloads(&self) -> u64 {
        self.progress.reloads.load(Ordering::Acquire)
    }

    /// Number of failed reloads.
    pub fn failures(&self) -> u64 {
        self.progress.failures.load(Ordering::Acquire)
    }

    /// Wait for the loop to exit.
    pub async fn join(self) -> Result<(), tokio::task::JoinError> {
        self.task.await
    }
}
