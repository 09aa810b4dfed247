//! File-level driver that feeds every record of a MARC file to a processor.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use log::info;

use super::reader::{MarcReader, ReaderOptions};
use super::types::error::{MarcError, RecordError, Result};
use super::types::models::Record;

/// Receives the records of a file, in order.
///
/// Only `process_record` is required; the framing hooks default to no-ops.
pub trait Processor {
    fn process_record(&mut self, record: &Record) -> io::Result<()>;

    /// Called once before the first record.
    fn header(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Called between two processed records.
    fn separator(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Called once after the last record.
    fn footer(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Counts from one complete pass over a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadSummary {
    /// Records decoded.
    pub records: usize,
    /// Records that matched the search and were handed to the processor.
    pub matched: usize,
}

/// A MARC file opened for one sequential pass.
#[derive(Debug)]
pub struct MarcFile<R: Read = File> {
    name: PathBuf,
    reader: MarcReader<R>,
}

impl MarcFile<File> {
    pub fn open(path: impl AsRef<Path>, options: ReaderOptions) -> Result<Self> {
        let path = path.as_ref();
        let reader = MarcReader::open_with_options(path, options)?;
        Ok(Self {
            name: path.to_path_buf(),
            reader,
        })
    }
}

impl<R: Read> MarcFile<R> {
    /// Wrap an already opened source; `name` is only used for logging.
    pub fn from_reader(name: impl Into<PathBuf>, reader: MarcReader<R>) -> Self {
        Self {
            name: name.into(),
            reader,
        }
    }

    pub fn name(&self) -> &Path {
        &self.name
    }

    /// Decode every record and pass those matching `search` to `processor`.
    ///
    /// An empty `search` matches every record. The first decode failure
    /// stops the pass and is returned; records already processed stay
    /// processed. A failing processor hook is reported the same way, with
    /// the I/O error as its source.
    pub fn read_all<P: Processor + ?Sized>(
        mut self,
        processor: &mut P,
        search: &str,
    ) -> std::result::Result<ReadSummary, RecordError> {
        let mut summary = ReadSummary::default();

        processor.header().map_err(|e| self.hook_error(e, 0, 0))?;
        loop {
            let record_offset = self.reader.offset();
            let Some(record) = self.reader.read_record()? else {
                break;
            };
            summary.records += 1;
            if !record.is_match(search) {
                continue;
            }
            if summary.matched > 0 {
                processor
                    .separator()
                    .map_err(|e| self.hook_error(e, record.position, record_offset))?;
            }
            processor
                .process_record(&record)
                .map_err(|e| self.hook_error(e, record.position, record_offset))?;
            summary.matched += 1;
        }
        let end = self.reader.offset();
        processor
            .footer()
            .map_err(|e| self.hook_error(e, self.reader.records_read(), end))?;

        info!(
            "Finished {}: {} records read, {} matched",
            self.name.display(),
            summary.records,
            summary.matched
        );
        Ok(summary)
    }

    /// `position` and `record_offset` name the record the hook ran for.
    fn hook_error(&self, e: io::Error, position: usize, record_offset: u64) -> RecordError {
        RecordError {
            position,
            record_offset,
            offset: self.reader.offset(),
            last_good: self.reader.last_good().map(str::to_string),
            source: MarcError::Io(e),
        }
    }
}

/// Writes records in mnemonic text form, one field per line, with a blank
/// line between records.
#[derive(Debug)]
pub struct MnemonicProcessor<W: Write> {
    out: W,
}

impl<W: Write> MnemonicProcessor<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Processor for MnemonicProcessor<W> {
    fn process_record(&mut self, record: &Record) -> io::Result<()> {
        record.write_mnemonic(&mut self.out)?;
        writeln!(self.out)
    }

    fn separator(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    fn footer(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
