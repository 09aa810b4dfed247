//! # marc-reader
//!
//! Prints the records of one or more MARC21 files in mnemonic form.
//!
//! ```bash
//! marc-reader records.mrc
//! marc-reader --search diabetes -v a.mrc b.mrc
//! marc-reader --count --strict records.mrc
//! ```

use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use marc_reader::{MarcFile, MnemonicProcessor, Processor, ReadSummary, ReaderOptions, Record};

/// Read MARC21 binary files and print their records.
#[derive(Parser)]
#[command(name = "marc-reader")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// MARC files to read, in order
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Only output records containing this text (case-insensitive)
    #[arg(short, long, default_value = "")]
    search: String,

    /// Fail on records whose declared lengths do not reconcile
    #[arg(long)]
    strict: bool,

    /// Print record counts instead of records
    #[arg(long)]
    count: bool,

    /// Verbosity level (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Discards records; used with `--count`.
struct CountOnly;

impl Processor for CountOnly {
    fn process_record(&mut self, _record: &Record) -> io::Result<()> {
        Ok(())
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let options = ReaderOptions {
        strict_lengths: cli.strict,
    };

    let mut failed = 0;
    for path in &cli.files {
        match read_file(path, &cli, options) {
            Ok(summary) => {
                if cli.count {
                    println!("{}\t{}\t{}", path.display(), summary.records, summary.matched);
                }
            }
            Err(e) => {
                error!("{:#}", e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        info!("{} of {} files failed", failed, cli.files.len());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn read_file(path: &Path, cli: &Cli, options: ReaderOptions) -> Result<ReadSummary> {
    let file = MarcFile::open(path, options)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let summary = if cli.count {
        file.read_all(&mut CountOnly, &cli.search)
    } else {
        let stdout = io::stdout();
        let mut processor = MnemonicProcessor::new(BufWriter::new(stdout.lock()));
        file.read_all(&mut processor, &cli.search)
    };

    summary.with_context(|| format!("Failed to read {}", path.display()))
}
