//! # MARC21 Binary Format Decoders
//!
//! Pure functions that turn byte spans into typed record components. They
//! do no I/O; the [`reader`](crate::marc::reader) hands them exactly the
//! bytes each structure occupies.
//!
//! - [`leader`]: the fixed 24-byte leader.
//! - [`directory`]: the 12-byte entries between the leader and the data.
//! - [`field`]: one field value, control or data.

pub mod directory;
pub mod field;
pub mod leader;

/// Terminates the directory and every field value.
pub const FIELD_SEPARATOR: u8 = 0x1E;

/// Introduces each subfield inside a data field.
pub const SUBFIELD_DELIMITER: u8 = 0x1F;

/// Marks the end of a record.
pub const RECORD_TERMINATOR: u8 = 0x1D;

/// Largest record the five-digit leader length can describe.
pub const MAX_RECORD_LEN: usize = 99_999;
