//! Delayed deletion of downloaded files.
//!
//! Every served download schedules its file for deletion after a fixed
//! delay. Deletion is best effort: a file that is already gone is not an
//! error. Wiping the output directory cancels all pending deletions.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::AbortHandle;
use tokio::time::Instant;
use tracing::{debug, error, info};

use crate::metrics;

/// Tracks files scheduled for deletion and owns their timer tasks.
#[derive(Clone, Debug)]
pub struct CleanupRegistry {
    delay: Duration,
    pending: Arc<Mutex<HashMap<PathBuf, AbortHandle>>>,
}

impl CleanupRegistry {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    // Critical sections never panic, so a poisoned lock still holds a consistent map
    fn entries(&self) -> MutexGuard<'_, HashMap<PathBuf, AbortHandle>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Schedule `path` for deletion after the configured delay.
    ///
    /// Returns `false` when the file is already scheduled; the existing timer
    /// is kept. Must be called from within a tokio runtime.
    pub fn schedule(&self, path: PathBuf) -> bool {
        let mut pending = self.entries();
        if pending.contains_key(&path) {
            debug!(path = %path.display(), "File already scheduled for cleanup");
            return false;
        }

        // The deadline is fixed now, not when the task is first polled
        let deadline = Instant::now() + self.delay;
        let registry = self.clone();
        let task_path = path.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            registry.expire(&task_path);
        });

        pending.insert(path.clone(), handle.abort_handle());
        metrics::set_pending_cleanup(pending.len());
        info!(
            path = %path.display(),
            delay_secs = self.delay.as_secs(),
            "Scheduled file cleanup"
        );
        true
    }

    fn expire(&self, path: &Path) {
        match std::fs::remove_file(path) {
            Ok(()) => {
                info!(path = %path.display(), "Cleaned up file");
                metrics::record_file_cleaned();
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "File already removed");
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Error cleaning up file");
            }
        }

        let mut pending = self.entries();
        pending.remove(path);
        metrics::set_pending_cleanup(pending.len());
    }

    /// Abort every pending deletion and forget the files.
    pub fn cancel_all(&self) -> usize {
        let mut pending = self.entries();
        let cancelled = pending.len();
        for (_, handle) in pending.drain() {
            handle.abort();
        }
        metrics::set_pending_cleanup(0);
        if cancelled > 0 {
            debug!(cancelled, "Cancelled pending cleanups");
        }
        cancelled
    }

    pub fn pending_count(&self) -> usize {
        self.entries().len()
    }

    pub fn is_pending(&self, path: &Path) -> bool {
        self.entries().contains_key(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Let spawned tasks run up to their next await point.
    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_file_deleted_after_delay() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.csv");
        std::fs::write(&file, "x").unwrap();

        let registry = CleanupRegistry::new(Duration::from_secs(300));
        assert!(registry.schedule(file.clone()));
        assert_eq!(registry.pending_count(), 1);

        tokio::time::advance(Duration::from_secs(299)).await;
        settle().await;
        assert!(file.exists());

        tokio::time::advance(Duration::from_secs(2)).await;
        settle().await;
        assert!(!file.exists());
        assert_eq!(registry.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_counts_from_schedule_call() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("b.zip");
        std::fs::write(&file, "x").unwrap();

        let registry = CleanupRegistry::new(Duration::from_secs(300));
        registry.schedule(file.clone());

        // No yield between scheduling and the clock jump
        tokio::time::advance(Duration::from_secs(301)).await;
        settle().await;
        assert!(!file.exists());
        assert!(!registry.is_pending(&file));
    }

    #[tokio::test(start_paused = true)]
    async fn test_schedule_is_idempotent() {
        let registry = CleanupRegistry::new(Duration::from_secs(300));
        let path = PathBuf::from("/nonexistent/file.csv");

        assert!(registry.schedule(path.clone()));
        assert!(!registry.schedule(path.clone()));
        assert_eq!(registry.pending_count(), 1);
        assert!(registry.is_pending(&path));
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_file_is_ignored() {
        let registry = CleanupRegistry::new(Duration::from_secs(1));
        registry.schedule(PathBuf::from("/nonexistent/file.csv"));

        tokio::time::advance(Duration::from_secs(2)).await;
        settle().await;
        assert_eq!(registry.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_all_keeps_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.csv");
        std::fs::write(&file, "x").unwrap();

        let registry = CleanupRegistry::new(Duration::from_secs(10));
        registry.schedule(file.clone());
        assert_eq!(registry.cancel_all(), 1);
        assert_eq!(registry.pending_count(), 0);

        tokio::time::advance(Duration::from_secs(20)).await;
        settle().await;
        assert!(file.exists());
    }
}
