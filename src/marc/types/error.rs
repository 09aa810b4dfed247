//! Custom error types for the marc-reader crate.

use thiserror::Error;

/// A structural problem found while decoding one MARC record.
#[derive(Debug, Error)]
pub enum MarcError {
    /// An error originating from the underlying byte source.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// The 24-byte leader is short or its numeric positions are not digits.
    #[error("Malformed leader: {reason} (raw leader: {raw:?})")]
    MalformedLeader { reason: String, raw: String },

    /// The directory is unterminated, misaligned, or has non-digit numbers.
    #[error("Malformed directory: {reason} (raw directory: {raw:?})")]
    MalformedDirectory { reason: String, raw: String },

    /// A field value is empty or does not end with a field separator.
    #[error("Truncated field {tag}: {reason}")]
    TruncatedField { tag: String, reason: String },

    /// A data field is too short to hold two indicators and a subfield delimiter.
    #[error("Invalid indicators detected in field {tag} (raw value: {raw:?})")]
    InvalidIndicators { tag: String, raw: String },

    /// Two subfield delimiters in a row, or a delimiter right before the field separator.
    #[error("Extraneous field terminator in field {tag} at subfield {index} (raw value: {raw:?})")]
    ExtraneousTerminator { tag: String, index: usize, raw: String },

    /// The byte after the last field is not the record terminator.
    #[error("End of record byte not found: {0}")]
    MissingRecordTerminator(String),

    /// The stream ended in the middle of a record.
    #[error("Unexpected end of stream while reading {context}: expected {expected} bytes, found {found}")]
    UnexpectedEndOfStream {
        context: String,
        expected: usize,
        found: usize,
    },

    /// Declared lengths in the leader or directory do not add up (strict mode only).
    #[error("Length mismatch for {context}: declared {declared}, computed {computed}")]
    LengthMismatch {
        context: &'static str,
        declared: usize,
        computed: usize,
    },
}

/// A convenience `Result` type alias using the crate's `MarcError` type.
pub type Result<T> = std::result::Result<T, MarcError>;

/// A decode failure together with the stream context needed to diagnose it.
///
/// Every `RecordError` is fatal to the stream it came from; the reader
/// returns no records after it.
#[derive(Debug, Error)]
#[error(
    "Records processed: {position}; error in record at byte {record_offset} (reached byte {offset}){}; error: {source}",
    last_good_suffix(.last_good)
)]
pub struct RecordError {
    /// Zero-based ordinal of the record that failed.
    pub position: usize,
    /// Byte offset at which the failing record started.
    pub record_offset: u64,
    /// Byte offset the reader had reached when the failure was detected.
    pub offset: u64,
    /// Summary of the last record decoded successfully, if any.
    pub last_good: Option<String>,
    #[source]
    pub source: MarcError,
}

impl RecordError {
    /// The underlying structural error.
    pub fn kind(&self) -> &MarcError {
        &self.source
    }
}

fn last_good_suffix(last_good: &Option<String>) -> String {
    match last_good {
        Some(last) => format!("; last record processed: {}", last),
        None => String::new(),
    }
}
