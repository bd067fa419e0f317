//! # Decode Command
//!
//! Decodes every data file of one source and prints each record as a JSON
//! array, one per line. Absent values print as `null`.
//!
//! Data files are the regular, non-hidden entries of
//! `<data-root>/<source>/`, visited in name order. Subdirectories are not
//! descended into. Files ending in `.gz` are gunzipped on the fly,
//! including multi-member archives. Files are read line by line; nothing is
//! buffered beyond the current line.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use flate2::read::MultiGzDecoder;

use tabschema_core::Record;
use tabschema_schema::SchemaCatalog;

/// Arguments of `tabschema decode`.
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Source key.
    pub source: String,

    /// Stop after printing this many records.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Abort on the first undecodable record instead of skipping it.
    #[arg(long)]
    pub fail_fast: bool,
}

/// Decode the data files of `args.source` to `out`.
pub fn run_decode(args: &DecodeArgs, catalog: &SchemaCatalog, out: &mut impl Write) -> Result<u8> {
    let dir = catalog.source_dir(&args.source)?;
    let files = data_files(&dir)?;
    if files.is_empty() {
        tracing::warn!(dir = %dir.display(), "no data files for source");
    }

    let limit_reached = |written: usize| args.limit.is_some_and(|n| written >= n);
    let mut written = 0usize;
    let mut skipped = 0usize;

    'files: for path in &files {
        if limit_reached(written) {
            break;
        }
        tracing::debug!(file = %path.display(), "decoding");

        let mut lines = FileLines::new(open_data_file(path)?);

        for result in catalog.stream_source(&args.source, &mut lines)? {
            match result {
                Ok(record) => {
                    write_record(out, &record)?;
                    written += 1;
                    if limit_reached(written) {
                        break 'files;
                    }
                }
                Err(e) if args.fail_fast => {
                    return Err(e).with_context(|| format!("decoding {}", path.display()));
                }
                Err(e) => {
                    skipped += 1;
                    tracing::warn!(file = %path.display(), error = %e, "skipping undecodable record");
                }
            }
        }

        if let Some(e) = lines.take_error() {
            return Err(e).with_context(|| format!("reading {}", path.display()));
        }
    }

    out.flush()?;
    tracing::info!(
        source = %args.source,
        files = files.len(),
        records = written,
        skipped,
        "decode finished"
    );
    Ok(0)
}

fn write_record(out: &mut impl Write, record: &Record) -> Result<()> {
    serde_json::to_writer(&mut *out, record)?;
    writeln!(out)?;
    Ok(())
}

/// Buffered reader over a data file, decompressing `.gz` files.
pub fn open_data_file(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Regular, non-hidden files directly inside `dir`, sorted by path.
pub fn data_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("listing data directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("listing data directory {}", dir.display()))?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Lines of a reader, ending at the first read error.
///
/// The error is kept for [`FileLines::take_error`] so the line iterator can
/// feed a record stream, which only accepts plain lines.
#[derive(Debug)]
pub struct FileLines<R> {
    lines: Lines<R>,
    error: Option<io::Error>,
}

impl<R: BufRead> FileLines<R> {
    /// Iterate the lines of `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            error: None,
        }
    }

    /// The read error that ended iteration, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }
}

impl<R: BufRead> Iterator for FileLines<R> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.error.is_some() {
            return None;
        }
        match self.lines.next()? {
            Ok(line) => Some(line),
            Err(e) => {
                self.error = Some(e);
                None
            }
        }
    }
}
