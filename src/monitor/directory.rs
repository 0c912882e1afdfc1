//! Directory change source built on notify.
//!
//! Watches the leveldb directory and forwards debounced filesystem
//! events as [`DirectoryChange`] values over a tokio channel, in
//! delivery order. The scanner consumes them one at a time.

use std::path::{Path, PathBuf};
use std::sync::mpsc as std_mpsc;
use std::thread;
use std::time::Duration;

use notify_debouncer_full::{
    new_debouncer,
    notify::{self, event::ModifyKind, EventKind, RecursiveMode},
    DebounceEventResult,
};
use tokio::sync::mpsc;

use super::error::MonitorError;
use super::scanner::{ChangeAction, DirectoryChange};

/// Default debounce window for rapid-fire filesystem events.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// Watches a directory and emits [`DirectoryChange`] notifications.
///
/// Uses notify-debouncer-full and bridges its std-mpsc delivery to a
/// tokio mpsc channel on a dedicated thread, keeping the consumer side
/// a single FIFO stream.
pub struct DirectoryWatcher {
    /// The directory being watched.
    watch_dir: PathBuf,
    /// Handle to stop the bridge thread.
    stop_tx: std_mpsc::Sender<()>,
    /// Handle to the bridge thread.
    #[allow(dead_code)]
    bridge_handle: thread::JoinHandle<()>,
}

impl DirectoryWatcher {
    /// Start watching `watch_dir` (non-recursive).
    ///
    /// Returns the watcher and the receiver for change notifications.
    ///
    /// # Errors
    ///
    /// Returns `MonitorError::WatchDirMissing` if the directory does not
    /// exist, or a notify error if the watcher cannot be created. A
    /// missing watch directory is the one condition the surrounding
    /// application treats as fatal.
    pub fn new(
        watch_dir: PathBuf,
        debounce: Duration,
    ) -> Result<(Self, mpsc::UnboundedReceiver<DirectoryChange>), MonitorError> {
        if !watch_dir.is_dir() {
            return Err(MonitorError::WatchDirMissing(watch_dir));
        }

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = std_mpsc::channel();
        let (notify_tx, notify_rx) = std_mpsc::channel();

        let mut debouncer = new_debouncer(debounce, None, move |result| {
            let _ = notify_tx.send(result);
        })?;
        debouncer.watch(&watch_dir, RecursiveMode::NonRecursive)?;

        let bridge_handle = thread::spawn(move || {
            loop {
                match stop_rx.try_recv() {
                    Ok(()) | Err(std_mpsc::TryRecvError::Disconnected) => break,
                    Err(std_mpsc::TryRecvError::Empty) => {}
                }

                match notify_rx.recv_timeout(Duration::from_millis(100)) {
                    Ok(result) => Self::forward_debounce_result(result, &event_tx),
                    Err(std_mpsc::RecvTimeoutError::Timeout) => {}
                    Err(std_mpsc::RecvTimeoutError::Disconnected) => break,
                }
            }

            // Keep the debouncer alive until the thread exits.
            drop(debouncer);
        });

        Ok((
            Self {
                watch_dir,
                stop_tx,
                bridge_handle,
            },
            event_rx,
        ))
    }

    /// Forward one debounce result as change notifications.
    fn forward_debounce_result(
        result: DebounceEventResult,
        event_tx: &mpsc::UnboundedSender<DirectoryChange>,
    ) {
        match result {
            Ok(events) => {
                for event in &events {
                    let Some(action) = Self::action_for(&event.kind) else {
                        continue;
                    };
                    for path in &event.paths {
                        let change = DirectoryChange::new(action, path.clone());
                        if event_tx.send(change).is_err() {
                            return;
                        }
                    }
                }
            }
            Err(errors) => {
                for error in errors {
                    tracing::warn!(error = %error, "Notify watcher error");
                }
            }
        }
    }

    /// Map a notify event kind onto the change source vocabulary.
    fn action_for(kind: &EventKind) -> Option<ChangeAction> {
        match kind {
            EventKind::Create(_) => Some(ChangeAction::Created),
            EventKind::Modify(ModifyKind::Name(_)) => Some(ChangeAction::Renamed),
            EventKind::Modify(_) => Some(ChangeAction::Modified),
            EventKind::Remove(_) => Some(ChangeAction::Removed),
            _ => None,
        }
    }

    /// The directory being watched.
    #[must_use]
    pub fn watch_dir(&self) -> &Path {
        &self.watch_dir
    }

    /// Stop the bridge thread. Dropping the watcher has the same effect.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_directory_is_fatal() {
        let result = DirectoryWatcher::new(
            PathBuf::from("/nonexistent/leveldb/dir"),
            DEFAULT_DEBOUNCE,
        );
        assert!(matches!(result, Err(MonitorError::WatchDirMissing(_))));
    }

    #[tokio::test]
    async fn test_watcher_reports_dir() {
        let temp_dir = TempDir::new().unwrap();
        let result = DirectoryWatcher::new(temp_dir.path().to_path_buf(), DEFAULT_DEBOUNCE);

        match result {
            Ok((watcher, _rx)) => {
                assert_eq!(watcher.watch_dir(), temp_dir.path());
                watcher.stop();
            }
            Err(MonitorError::Notify(e)) => {
                // Skip test if system has too many watchers.
                eprintln!("Skipping test due to system limit: {e}");
            }
            Err(e) => panic!("Unexpected error: {e}"),
        }
    }

    #[tokio::test]
    async fn test_watcher_detects_log_writes() {
        let temp_dir = TempDir::new().unwrap();
        let result = DirectoryWatcher::new(temp_dir.path().to_path_buf(), DEFAULT_DEBOUNCE);

        let (watcher, mut rx) = match result {
            Ok(r) => r,
            Err(MonitorError::Notify(e)) => {
                eprintln!("Skipping test due to system limit: {e}");
                return;
            }
            Err(e) => panic!("Unexpected error: {e}"),
        };

        // Give the watcher time to initialize.
        tokio::time::sleep(Duration::from_millis(50)).await;

        let log_path = temp_dir.path().join("000001.log");
        {
            let mut file = std::fs::File::create(&log_path).unwrap();
            write!(file, "record\r").unwrap();
        }

        let change = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await;
        watcher.stop();

        // Might time out on slow CI systems; when delivered it must
        // reference the log file.
        if let Ok(Some(change)) = change {
            assert!(change.path.starts_with(temp_dir.path()));
        }
    }

    #[test]
    fn test_action_mapping() {
        use notify::event::{CreateKind, DataChange, MetadataKind, RemoveKind, RenameMode};

        assert_eq!(
            DirectoryWatcher::action_for(&EventKind::Create(CreateKind::File)),
            Some(ChangeAction::Created)
        );
        assert_eq!(
            DirectoryWatcher::action_for(&EventKind::Modify(ModifyKind::Data(
                DataChange::Content
            ))),
            Some(ChangeAction::Modified)
        );
        assert_eq!(
            DirectoryWatcher::action_for(&EventKind::Modify(ModifyKind::Metadata(
                MetadataKind::WriteTime
            ))),
            Some(ChangeAction::Modified)
        );
        assert_eq!(
            DirectoryWatcher::action_for(&EventKind::Modify(ModifyKind::Name(
                RenameMode::To
            ))),
            Some(ChangeAction::Renamed)
        );
        assert_eq!(
            DirectoryWatcher::action_for(&EventKind::Remove(RemoveKind::File)),
            Some(ChangeAction::Removed)
        );
        assert_eq!(DirectoryWatcher::action_for(&EventKind::Access(
            notify::event::AccessKind::Read
        )), None);
    }
}
