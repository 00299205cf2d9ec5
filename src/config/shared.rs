//! Process-wide handle to the current configuration.
//!
//! # Design Decisions
//! - Readers take an `Arc<T>` snapshot; it stays valid and unchanged even if
//!   a reload happens while it is held
//! - Writers replace the whole record with one pointer swap, so a reader
//!   never sees a mix of old and new fields
//! - Single writer (loader/watcher), any number of readers

use arc_swap::ArcSwap;
use std::fmt;
use std::sync::Arc;

/// Shared slot holding the current configuration record.
pub struct SharedConfig<T> {
    inner: Arc<ArcSwap<T>>,
}

impl<T> SharedConfig<T> {
    /// Create a handle holding `value`.
    pub fn with_value(value: T) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(value)),
        }
    }

    /// Snapshot of the current record.
    pub fn load(&self) -> Arc<T> {
        self.inner.load_full()
    }

    /// Replace the current record, returning the previous one.
    pub fn store(&self, value: T) -> Arc<T> {
        self.inner.swap(Arc::new(value))
    }
}

impl<T: Default> SharedConfig<T> {
    /// Create a handle holding the record's default (zero) value.
    pub fn new() -> Self {
        Self::with_value(T::default())
    }
}

impl<T: Default> Default for SharedConfig<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for SharedConfig<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedConfig").field(&*self.inner.load()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Record {
        name: String,
        port: u16,
    }

    #[test]
    fn test_starts_with_default() {
        let shared: SharedConfig<Record> = SharedConfig::new();
        assert_eq!(*shared.load(), Record::default());
    }

    #[test]
    fn test_store_visible_through_clones() {
        let shared: SharedConfig<Record> = SharedConfig::new();
        let reader = shared.clone();

        let previous = shared.store(Record { name: "a".into(), port: 80 });
        assert_eq!(*previous, Record::default());
        assert_eq!(reader.load().port, 80);
    }

    #[test]
    fn test_snapshot_survives_store() {
        let shared = SharedConfig::with_value(Record { name: "old".into(), port: 1 });
        let snapshot = shared.load();

        shared.store(Record { name: "new".into(), port: 2 });

        assert_eq!(snapshot.name, "old");
        assert_eq!(shared.load().name, "new");
    }
}
