//! Iterator access to a record stream.
//!
//! # Example
//! ```no_run
//! # use marc_reader::MarcReader;
//! let reader = MarcReader::open("records.mrc").unwrap();
//! for result in reader {
//!     let record = result.unwrap();
//!     println!("{:?}", record.title());
//! }
//! ```

use std::io::Read;
use std::iter::FusedIterator;

use super::reader::MarcReader;
use super::types::error::RecordError;
use super::types::models::Record;

/// Yields each record in stream order. After an error or the end of the
/// stream the iterator only returns `None`.
impl<R: Read> Iterator for MarcReader<R> {
    type Item = Result<Record, RecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_record().transpose()
    }
}

impl<R: Read> FusedIterator for MarcReader<R> {}
