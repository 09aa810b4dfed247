//! Core MARC21 reader module

pub mod driver;
pub mod format;
pub mod iter;
pub mod reader;
pub mod types;
mod utils;

pub use driver::{MarcFile, MnemonicProcessor, Processor, ReadSummary};
pub use reader::{MarcReader, ReaderOptions, ReaderState};
pub use types::error::{MarcError, RecordError, Result};
pub use types::models::{DirEntry, Field, FieldKind, Leader, Record, SubField};
