//! Monitor module for the WhatsApp leveldb log.
//!
//! Tracks the active `.log` file across rotations, classifies newly
//! appended records and emits lifecycle events.

mod cursor;
mod directory;
mod emitter;
mod error;
mod matcher;
mod records;
mod scanner;

pub use cursor::ScanCursor;
pub use directory::{DirectoryWatcher, DEFAULT_DEBOUNCE};
pub use emitter::{EventCallback, EventEmitter};
pub use error::MonitorError;
pub use matcher::{LogMarker, MarkerMatcher, FULL_INIT_MARKER};
pub use records::{count_delimiters, split_records, Record, RECORD_DELIMITER};
pub use scanner::{ChangeAction, DirectoryChange, LogScanner, LOG_EXTENSION};
