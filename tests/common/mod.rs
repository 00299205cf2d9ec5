//! Shared utilities for integration tests.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

/// Write `contents` to `name` inside a fresh temp dir.
///
/// The directory is removed when the returned guard is dropped.
pub fn write_config(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    (dir, path)
}

/// Poll `cond` until it holds or `timeout` elapses.
pub async fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    cond()
}
