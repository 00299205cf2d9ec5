//! Config center client interface.
//!
//! A config center distributes configuration text to services and tells them
//! when it changes. The wire protocol belongs to the client implementation;
//! the loader only needs the three operations below.
//!
//! Connecting is each implementation's constructor, returning
//! `Result<Self, CenterError>` and failing when the center is unreachable.

use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

/// Capacity of change-notification channels. Notifications beyond this that
/// a slow receiver misses are reported as a lag.
pub const EVENT_CAPACITY: usize = 16;

/// A connected config center client.
///
/// `fetch` may block on I/O; the reload watcher calls it from Tokio's
/// blocking pool.
pub trait ConfigCenter: Send + Sync + 'static {
    /// Current configuration text, or `None` if the center has no data.
    fn fetch(&self) -> Option<String>;

    /// Subscribe to change notifications. One unit event per change.
    fn subscribe(&self) -> broadcast::Receiver<()>;
}

impl<C: ConfigCenter + ?Sized> ConfigCenter for Arc<C> {
    fn fetch(&self) -> Option<String> {
        (**self).fetch()
    }

    fn subscribe(&self) -> broadcast::Receiver<()> {
        (**self).subscribe()
    }
}

/// In-process config center.
///
/// Useful for embedding the loader where configuration is pushed by the host
/// process, and for tests.
pub struct MemoryCenter {
    payload: RwLock<Option<String>>,
    events: broadcast::Sender<()>,
}

impl MemoryCenter {
    /// Create an empty center.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            payload: RwLock::new(None),
            events,
        }
    }

    /// Create a center already holding `payload`.
    pub fn with_payload(payload: impl Into<String>) -> Self {
        let center = Self::new();
        *center.payload.write().expect("memory center lock poisoned") = Some(payload.into());
        center
    }

    /// Replace the payload and notify subscribers.
    pub fn publish(&self, payload: impl Into<String>) {
        *self.payload.write().expect("memory center lock poisoned") = Some(payload.into());
        self.notify();
    }

    /// Drop the payload without notifying.
    pub fn clear(&self) {
        *self.payload.write().expect("memory center lock poisoned") = None;
    }

    /// Notify subscribers without changing the payload.
    pub fn notify(&self) {
        // No subscribers is not an error.
        let _ = self.events.send(());
    }
}

impl Default for MemoryCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigCenter for MemoryCenter {
    fn fetch(&self) -> Option<String> {
        self.payload.read().expect("memory center lock poisoned").clone()
    }

    fn subscribe(&self) -> broadcast::Receiver<()> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_empty() {
        let center = MemoryCenter::new();
        assert!(center.fetch().is_none());
    }

    #[test]
    fn test_publish_notifies() {
        let center = MemoryCenter::with_payload("Proxy = false");
        let mut rx = center.subscribe();

        center.publish("Proxy = true");

        assert!(rx.try_recv().is_ok());
        assert_eq!(center.fetch().as_deref(), Some("Proxy = true"));
    }

    #[test]
    fn test_clear_is_silent() {
        let center = MemoryCenter::with_payload("Proxy = true");
        let mut rx = center.subscribe();

        center.clear();

        assert!(rx.try_recv().is_err());
        assert!(center.fetch().is_none());
    }
}
