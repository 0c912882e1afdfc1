//! Scan position tracking for the active log file.

use std::path::{Path, PathBuf};

/// Position state for the log file currently believed to be active.
///
/// Stores the highest record index confirmed handled in that file.
/// Owned and mutated exclusively by the scanner; superseded wholesale
/// when the log rotates.
#[derive(Debug, Default)]
pub struct ScanCursor {
    active_path: Option<PathBuf>,
    processed: usize,
}

impl ScanCursor {
    /// Create a cursor tracking no file yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Path of the active log file, if one has been seen.
    #[must_use]
    pub fn active_path(&self) -> Option<&Path> {
        self.active_path.as_deref()
    }

    /// Whether `path` is the tracked active file (exact comparison).
    #[must_use]
    pub fn is_same_file(&self, path: &Path) -> bool {
        self.active_path.as_deref() == Some(path)
    }

    /// Make `path` the active file and zero the processed count.
    pub fn reset_to(&mut self, path: PathBuf) {
        self.active_path = Some(path);
        self.processed = 0;
    }

    /// Highest record index confirmed handled in the active file.
    #[must_use]
    pub fn processed_count(&self) -> usize {
        self.processed
    }

    /// Record the highest handled index. Monotonically non-decreasing
    /// while the same file stays active.
    pub fn set_processed_count(&mut self, count: usize) {
        self.processed = count;
    }
}
