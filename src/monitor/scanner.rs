//! Incremental scanner driven by directory change notifications.
//!
//! Consumes one `(action, path)` notification at a time, decides whether
//! the active log file rotated or just grew, and classifies exactly the
//! records appended since the last pass.

use std::path::PathBuf;

use tokio::fs;

use super::cursor::ScanCursor;
use super::emitter::EventEmitter;
use super::matcher::{LogMarker, MarkerMatcher};
use super::records;

/// Extension of the log files WhatsApp appends to. Sibling files in the
/// leveldb directory (lock files, manifests) are ignored.
pub const LOG_EXTENSION: &str = "log";

/// Kind of filesystem change reported by the change source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeAction {
    /// A file appeared in the directory.
    Created,
    /// A file's content or metadata changed.
    Modified,
    /// A file was renamed.
    Renamed,
    /// A file was removed.
    Removed,
}

/// A single change notification for the watched directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryChange {
    /// What happened.
    pub action: ChangeAction,
    /// Absolute path of the affected file.
    pub path: PathBuf,
}

impl DirectoryChange {
    #[must_use]
    pub fn new(action: ChangeAction, path: PathBuf) -> Self {
        Self { action, path }
    }
}

/// Scans the active log file incrementally and emits lifecycle events.
///
/// Must be driven from a single logical consumer: one notification is
/// processed to completion before the next, in delivery order. Cursor
/// state is owned here, so independent scanners can watch independent
/// directories.
#[derive(Debug)]
pub struct LogScanner {
    cursor: ScanCursor,
    matcher: MarkerMatcher,
    emitter: EventEmitter,
}

impl LogScanner {
    /// Create a scanner with no subscribers and no tracked file.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cursor: ScanCursor::new(),
            matcher: MarkerMatcher::new(),
            emitter: EventEmitter::new(),
        }
    }

    /// Register the `FullInit` subscriber. Replaces any previous one.
    pub fn on_full_init(&mut self, callback: impl FnMut() + Send + 'static) {
        self.emitter.on_full_init(callback);
    }

    /// Register the `MessageReceived` subscriber. Replaces any previous one.
    pub fn on_message_received(&mut self, callback: impl FnMut() + Send + 'static) {
        self.emitter.on_message_received(callback);
    }

    /// Whether a `FullInit` marker has been classified yet.
    #[must_use]
    pub fn is_fully_initialized(&self) -> bool {
        self.emitter.is_fully_initialized()
    }

    /// Current cursor state, mainly for diagnostics and tests.
    #[must_use]
    pub fn cursor(&self) -> &ScanCursor {
        &self.cursor
    }

    /// Process one change notification.
    ///
    /// I/O failures abort the pass with a diagnostic and keep prior
    /// cursor state; the writer may hold the file mid-write, and the
    /// next notification retries implicitly. Never fatal.
    pub async fn handle_change(&mut self, change: &DirectoryChange) {
        if !matches!(
            change.action,
            ChangeAction::Created | ChangeAction::Modified
        ) {
            return;
        }

        if !change
            .path
            .extension()
            .is_some_and(|ext| ext == LOG_EXTENSION)
        {
            return;
        }

        if !self.cursor.is_same_file(&change.path) {
            self.handle_rotation(change.path.clone()).await;
            return;
        }

        self.scan_new_records().await;
    }

    /// Catch-up pass: a different `.log` file became active.
    ///
    /// The new file typically already contains historical content that
    /// must not be re-announced, so this counts existing delimiters
    /// without classifying anything. Classification starts with records
    /// appended after this point.
    async fn handle_rotation(&mut self, path: PathBuf) {
        tracing::info!(path = %path.display(), "Active log file changed");
        self.cursor.reset_to(path.clone());

        match fs::read(&path).await {
            Ok(bytes) => {
                let count = records::count_delimiters(&bytes);
                self.cursor.set_processed_count(count);
                tracing::debug!(count, "Catch-up pass complete");
            }
            Err(e) => {
                // Likely locked by the writer; retried on the next change.
                tracing::debug!(
                    path = %path.display(),
                    error = %e,
                    "Could not read new log file during catch-up"
                );
            }
        }
    }

    /// Growth pass: the active file was modified in place.
    ///
    /// Enumerates terminated records by zero-based index and skips any
    /// index at or below the stored processed count. The `<=` boundary
    /// is deliberate and load-bearing: the cursor stores the highest
    /// index confirmed handled, and the catch-up pass stores a count of
    /// pre-existing delimiters, so the two passes meet without ever
    /// classifying the same index twice.
    async fn scan_new_records(&mut self) {
        let Some(path) = self.cursor.active_path().map(PathBuf::from) else {
            return;
        };

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(
                    path = %path.display(),
                    error = %e,
                    "Could not read log file, keeping cursor"
                );
                return;
            }
        };

        for (index, record) in records::split_records(&bytes).iter().enumerate() {
            if !record.is_terminated() {
                // Half-written trailing fragment: re-examined on the
                // next notification once the writer terminates it.
                break;
            }

            if index <= self.cursor.processed_count() {
                continue;
            }
            self.cursor.set_processed_count(index);

            for marker in self.matcher.classify(&record.text()) {
                match marker {
                    LogMarker::FullInit => {
                        tracing::debug!(index, "Found full-init marker");
                        self.emitter.emit_full_init();
                    }
                    LogMarker::MessageReceived => {
                        tracing::debug!(index, "Found message marker");
                        self.emitter.emit_message_received();
                    }
                }
            }
        }
    }
}

impl Default for LogScanner {
    fn default() -> Self {
        Self::new()
    }
}
