//! Record tokenizer for the `\r`-delimited log format.
//!
//! The leveldb log terminates records with a single carriage return, not
//! the platform line ending, so files are decoded as raw bytes rather
//! than text lines.

use std::borrow::Cow;

/// The record delimiter used by the log format.
pub const RECORD_DELIMITER: u8 = b'\r';

/// A single record extracted from a log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    bytes: &'a [u8],
    terminated: bool,
}

impl<'a> Record<'a> {
    /// Raw bytes of the record, delimiter excluded.
    #[must_use]
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Whether the record was followed by a delimiter.
    ///
    /// An unterminated record is a trailing fragment still being written
    /// by the log's owner and must not be classified yet.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Record content as text. Invalid UTF-8 is replaced, never an error.
    #[must_use]
    pub fn text(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.bytes)
    }
}

/// Split a byte buffer into records on the `\r` delimiter.
///
/// A trailing fragment with no terminating delimiter is returned as the
/// last record with `is_terminated() == false`; a buffer ending exactly
/// on a delimiter produces no trailing fragment.
#[must_use]
pub fn split_records(bytes: &[u8]) -> Vec<Record<'_>> {
    let mut records = Vec::new();
    let mut start = 0;

    for (i, byte) in bytes.iter().enumerate() {
        if *byte == RECORD_DELIMITER {
            records.push(Record {
                bytes: &bytes[start..i],
                terminated: true,
            });
            start = i + 1;
        }
    }

    if start < bytes.len() {
        records.push(Record {
            bytes: &bytes[start..],
            terminated: false,
        });
    }

    records
}

/// Count record delimiters in a byte buffer.
///
/// This is the catch-up primitive used when a new log file becomes
/// active: it establishes how many complete records already exist
/// without classifying any of them. Kept separate from [`split_records`]
/// so the two passes cannot drift into sharing index arithmetic.
#[must_use]
pub fn count_delimiters(bytes: &[u8]) -> usize {
    bytes.iter().filter(|byte| **byte == RECORD_DELIMITER).count()
}
