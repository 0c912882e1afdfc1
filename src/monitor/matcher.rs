//! Pattern matching for semantic marker records.
//!
//! Classifies a single log record against the fixed markers WhatsApp
//! writes to the leveldb log. Pure: no state, no side effects.

use regex::Regex;

/// Substring whose presence marks the end of WhatsApp's startup phase.
pub const FULL_INIT_MARKER: &str = "models:mute:cache";

/// Cheap pre-filter before running the message regex.
const RECV_HINT: &str = "recv:";

/// Structured pattern of a received-message record: sixteen lowercase hex
/// characters, a dot, two dashes, more hex, a quote, a tab, `timestampN`.
const MESSAGE_PATTERN: &str = r#"recv: [0-9a-f]{16}\.--[0-9a-f]+"\ttimestampN"#;

/// Semantic marker found in a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMarker {
    /// WhatsApp finished initializing.
    FullInit,
    /// A new message arrived.
    MessageReceived,
}

/// Classifies log records against the fixed marker patterns.
#[derive(Debug, Clone)]
pub struct MarkerMatcher {
    message: Regex,
}

impl MarkerMatcher {
    /// Create a matcher with the fixed patterns compiled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            // Fixed pattern, known to compile.
            message: Regex::new(MESSAGE_PATTERN).expect("message pattern is valid"),
        }
    }

    /// Classify one record, returning every marker it contains.
    ///
    /// A record that matches nothing returns an empty vec; malformed or
    /// binary content is simply non-matching, never an error.
    #[must_use]
    pub fn classify(&self, record: &str) -> Vec<LogMarker> {
        let mut markers = Vec::new();

        if record.contains(FULL_INIT_MARKER) {
            markers.push(LogMarker::FullInit);
        }

        if record.contains(RECV_HINT) && self.message.is_match(record) {
            markers.push(LogMarker::MessageReceived);
        }

        markers
    }
}

impl Default for MarkerMatcher {
    fn default() -> Self {
        Self::new()
    }
}
