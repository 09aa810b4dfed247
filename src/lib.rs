//! # marc-reader
//!
//! A sequential decoder for MARC21 binary bibliographic records.
//! Decodes the leader, directory, control fields and data fields (indicators
//! and subfields) of each record, and reports malformed input as errors that
//! carry the record position and the last record read successfully.
//!
//! **Note:** This crate only reads records; it does not write them or
//! convert character encodings.
pub mod marc;

// Re-export the main types for convenience
pub use marc::{
    MarcError,
    MarcFile,
    MarcReader,
    MnemonicProcessor,
    Processor,
    ReadSummary,
    ReaderOptions,
    ReaderState,
    RecordError,
    types::models::{
        DirEntry,
        Field,
        FieldKind,
        Leader,
        Record,
        SubField,
    },
};
