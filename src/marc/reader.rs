use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::Path;

use byteorder::ReadBytesExt;
use log::{debug, info, trace, warn};

use super::format::{self, FIELD_SEPARATOR, MAX_RECORD_LEN, RECORD_TERMINATOR};
use super::types::error::{MarcError, RecordError, Result};
use super::types::models::*;
use super::utils;

/// Options controlling how strictly records are validated.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReaderOptions {
    /// Fail with `LengthMismatch` when the leader and directory lengths do
    /// not reconcile. When off, mismatches are only logged.
    pub strict_lengths: bool,
}

/// Where the reader is in the decoding of the current record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    AwaitingLeader,
    AwaitingDirectory,
    AwaitingFieldValues,
    RecordComplete,
    /// The source ended cleanly between records.
    EndOfStream,
    /// A record failed to decode; no further records will be read.
    Faulted,
}

/// Sequential reader for a stream of MARC21 binary records.
///
/// The reader owns its source through a `BufReader` and counts every byte it
/// consumes, so the position of each record is known without seeking.
///
/// # Example
/// ```no_run
/// # use marc_reader::MarcReader;
/// let mut reader = MarcReader::open("records.mrc")?;
/// while let Some(record) = reader.read_record()? {
///     println!("{}", record);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct MarcReader<R: Read> {
    source: BufReader<R>,
    options: ReaderOptions,
    state: ReaderState,
    offset: u64,
    records: usize,
    last_good: Option<String>,
}

impl MarcReader<File> {
    /// Open a MARC file from the given path with default options.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_options(path, ReaderOptions::default())
    }

    pub fn open_with_options(path: impl AsRef<Path>, options: ReaderOptions) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening MARC file: {}", path.display());
        let file = File::open(path)?;
        Ok(Self::with_options(file, options))
    }
}

impl<R: Read> MarcReader<R> {
    pub fn new(source: R) -> Self {
        Self::with_options(source, ReaderOptions::default())
    }

    pub fn with_options(source: R, options: ReaderOptions) -> Self {
        Self {
            source: BufReader::new(source),
            options,
            state: ReaderState::AwaitingLeader,
            offset: 0,
            records: 0,
            last_good: None,
        }
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    /// Number of records decoded successfully so far.
    pub fn records_read(&self) -> usize {
        self.records
    }

    /// Number of bytes consumed from the source so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Summary of the most recent record decoded successfully.
    pub fn last_good(&self) -> Option<&str> {
        self.last_good.as_deref()
    }

    /// Decode the next record.
    ///
    /// Returns `Ok(None)` when the source is exhausted between records. Any
    /// structural problem is returned as a `RecordError` and faults the
    /// reader: every later call returns `Ok(None)`.
    pub fn read_record(&mut self) -> std::result::Result<Option<Record>, RecordError> {
        match self.state {
            ReaderState::EndOfStream => return Ok(None),
            ReaderState::Faulted => {
                debug!("Reader is faulted; ignoring read request");
                return Ok(None);
            }
            _ => {}
        }

        let record_offset = self.offset;
        match self.decode_record() {
            Ok(record) => Ok(record),
            Err(source) => {
                self.state = ReaderState::Faulted;
                Err(RecordError {
                    position: self.records,
                    record_offset,
                    offset: self.offset,
                    last_good: self.last_good.clone(),
                    source,
                })
            }
        }
    }

    fn decode_record(&mut self) -> Result<Option<Record>> {
        self.state = ReaderState::AwaitingLeader;
        let record_offset = self.offset;
        let leader = match self.read_leader()? {
            Some(leader) => leader,
            None => {
                self.state = ReaderState::EndOfStream;
                debug!("End of stream after {} records ({} bytes)", self.records, self.offset);
                return Ok(None);
            }
        };

        self.state = ReaderState::AwaitingDirectory;
        let directory = self.read_directory()?;

        self.state = ReaderState::AwaitingFieldValues;
        let fields = self.read_fields(&directory)?;
        self.read_terminator()?;

        let record = Record {
            position: self.records,
            leader,
            directory,
            fields,
        };
        if let Err(e) = record.check_lengths() {
            if self.options.strict_lengths {
                return Err(e);
            }
            warn!("Record {} at byte {}: {}", record.position, record_offset, e);
        }

        debug!(
            "Record {} decoded: {} fields, bytes {}..{}",
            record.position,
            record.fields.len(),
            record_offset,
            self.offset
        );
        self.state = ReaderState::RecordComplete;
        self.records += 1;
        self.last_good = Some(record.summary());
        Ok(Some(record))
    }

    /// Read the 24-byte leader. `None` means the source ended before any byte.
    fn read_leader(&mut self) -> Result<Option<Leader>> {
        let mut buf = [0u8; LEADER_LEN];
        let n = utils::read_up_to(&mut self.source, &mut buf)?;
        self.offset += n as u64;
        if n == 0 {
            return Ok(None);
        }
        format::leader::parse(&buf[..n]).map(Some)
    }

    /// Read up to and including the directory terminator, then decode it.
    fn read_directory(&mut self) -> Result<Vec<DirEntry>> {
        let mut span = Vec::new();
        let limit = (MAX_RECORD_LEN - LEADER_LEN) as u64;
        let n = self
            .source
            .by_ref()
            .take(limit)
            .read_until(FIELD_SEPARATOR, &mut span)?;
        self.offset += n as u64;

        if span.last() != Some(&FIELD_SEPARATOR) {
            return Err(MarcError::MalformedDirectory {
                reason: format!("no field separator found within {} bytes", n),
                raw: utils::lossy(&span),
            });
        }
        span.pop();
        trace!("Directory span: {} bytes", span.len());
        format::directory::parse(&span)
    }

    /// Read and decode every field value, in directory order.
    fn read_fields(&mut self, directory: &[DirEntry]) -> Result<Vec<Field>> {
        let mut fields = Vec::with_capacity(directory.len());
        for entry in directory {
            let mut buf = vec![0u8; entry.length];
            let n = utils::read_up_to(&mut self.source, &mut buf)?;
            self.offset += n as u64;
            if n < entry.length {
                return Err(MarcError::UnexpectedEndOfStream {
                    context: format!("field {}", entry.tag),
                    expected: entry.length,
                    found: n,
                });
            }
            fields.push(format::field::parse(&entry.tag, &buf)?);
        }
        Ok(fields)
    }

    fn read_terminator(&mut self) -> Result<()> {
        match self.source.read_u8() {
            Ok(RECORD_TERMINATOR) => {
                self.offset += 1;
                Ok(())
            }
            Ok(other) => {
                self.offset += 1;
                Err(MarcError::MissingRecordTerminator(format!(
                    "found byte {:#04x} instead of {:#04x}",
                    other, RECORD_TERMINATOR
                )))
            }
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(
                MarcError::MissingRecordTerminator("stream ended after the last field".to_string()),
            ),
            Err(e) => Err(e.into()),
        }
    }
}
