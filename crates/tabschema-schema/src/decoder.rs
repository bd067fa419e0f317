//! # Record Decoding
//!
//! [`RecordDecoder`] decodes one delimited line against a compiled
//! [`SourceSchema`]. [`RecordStream`] applies it lazily to every line of a
//! caller-supplied line source.
//!
//! The decoder borrows the compiled schema; nothing is looked up or built
//! per record beyond the output vector.
//!
//! ## Streams
//!
//! A stream is exactly as long-lived and as restartable as its line source:
//! finite when the lines are finite, single-pass when the lines are
//! single-pass. To decode a file twice, open it twice. A bad line yields an
//! `Err` item carrying its line number and the stream carries on; stopping,
//! skipping, or logging is the caller's decision.

use tabschema_core::{DecodeError, Record, RecordError};

use crate::config::DEFAULT_DELIMITER;
use crate::descriptor::SourceSchema;

/// Decodes raw lines of one data source.
#[derive(Debug, Clone, Copy)]
pub struct RecordDecoder<'a> {
    schema: &'a SourceSchema,
    delimiter: char,
}

impl<'a> RecordDecoder<'a> {
    /// Decoder for `schema` splitting on [`DEFAULT_DELIMITER`].
    pub fn new(schema: &'a SourceSchema) -> Self {
        Self {
            schema,
            delimiter: DEFAULT_DELIMITER,
        }
    }

    /// Use `delimiter` to split fields.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// The schema records are decoded against.
    pub fn schema(&self) -> &'a SourceSchema {
        self.schema
    }

    /// The field delimiter.
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Decode one line into values in position order.
    ///
    /// A trailing `\n` or `\r\n` is ignored. Tokens are not unquoted or
    /// trimmed before decoding.
    ///
    /// # Errors
    ///
    /// - `DecodeError::FieldCount` if the line does not split into exactly
    ///   one token per field.
    /// - `DecodeError::Format` if a token is rejected by its field's decoder.
    pub fn decode(&self, raw_line: &str) -> Result<Record, DecodeError> {
        let line = strip_line_ending(raw_line);
        let fields = self.schema.fields();

        let actual = line.split(self.delimiter).count();
        if actual != fields.len() {
            return Err(DecodeError::FieldCount {
                expected: fields.len(),
                actual,
            });
        }

        line.split(self.delimiter)
            .zip(fields)
            .map(|(token, field)| {
                field.decode(token).map_err(|source| DecodeError::Format {
                    label: field.label.clone(),
                    position: field.position,
                    source,
                })
            })
            .collect()
    }

    /// Lazily decode every line of `lines`.
    pub fn stream<I>(self, lines: I) -> RecordStream<'a, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        RecordStream {
            decoder: self,
            lines: lines.into_iter(),
            line: 0,
        }
    }
}

fn strip_line_ending(line: &str) -> &str {
    match line.strip_suffix('\n') {
        Some(rest) => rest.strip_suffix('\r').unwrap_or(rest),
        None => line,
    }
}

/// Lazy sequence of decoded records over a line source.
///
/// Yields `Err(RecordError)` for lines that fail to decode, with the
/// 1-based line number, and continues with the next line.
#[derive(Debug)]
pub struct RecordStream<'a, I> {
    decoder: RecordDecoder<'a>,
    lines: I,
    line: usize,
}

impl<'a, I> RecordStream<'a, I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    /// Number of lines consumed so far.
    pub fn lines_read(&self) -> usize {
        self.line
    }

    /// Drop undecodable records, logging each one at `warn`.
    pub fn skip_errors(self) -> SkipErrors<'a, I> {
        SkipErrors {
            inner: self,
            skipped: 0,
        }
    }
}

impl<I> Iterator for RecordStream<'_, I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = Result<Record, RecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        let raw = self.lines.next()?;
        self.line += 1;
        let line = self.line;
        Some(
            self.decoder
                .decode(raw.as_ref())
                .map_err(|source| RecordError { line, source }),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.lines.size_hint()
    }
}

/// A [`RecordStream`] that yields only successfully decoded records.
#[derive(Debug)]
pub struct SkipErrors<'a, I> {
    inner: RecordStream<'a, I>,
    skipped: usize,
}

impl<I> SkipErrors<'_, I> {
    /// Number of records dropped so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<I> Iterator for SkipErrors<'_, I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = Record;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                Ok(record) => return Some(record),
                Err(e) => {
                    self.skipped += 1;
                    tracing::warn!(
                        source = self.inner.decoder.schema().source_key(),
                        error = %e,
                        "skipping undecodable record"
                    );
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}
