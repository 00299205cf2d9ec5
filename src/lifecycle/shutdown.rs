//! Shutdown coordination.

use tokio::sync::broadcast;

/// Coordinator for stopping background tasks such as the reload watcher.
///
/// Tasks subscribe before they start; `trigger` wakes all of them. Dropping
/// the coordinator without triggering leaves subscribers running.
#[derive(Debug)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Number of tasks still subscribed.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_reaches_subscribers() {
        let shutdown = Shutdown::new();
        let mut a = shutdown.subscribe();
        let mut b = shutdown.subscribe();
        assert_eq!(shutdown.receiver_count(), 2);

        shutdown.trigger();

        assert!(a.try_recv().is_ok());
        assert!(b.try_recv().is_ok());
    }

    #[test]
    fn test_trigger_without_subscribers() {
        Shutdown::new().trigger();
    }
}
