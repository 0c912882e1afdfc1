//! Monitor error types.

use std::path::PathBuf;

/// Errors that can occur while watching the log directory.
#[derive(thiserror::Error, Debug)]
pub enum MonitorError {
    /// The directory to watch does not exist.
    #[error("Watch directory does not exist: {0}")]
    WatchDirMissing(PathBuf),

    /// Notify watcher error.
    #[error("File watcher error: {0}")]
    Notify(#[from] notify::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
