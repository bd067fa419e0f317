//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types used throughout tabschema. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Schema compilation is all-or-nothing: a single `SchemaError` aborts it.
//! - Decoding errors are per record and name the failing field.
//! - Lookup errors always carry the valid names so callers can show them.

use thiserror::Error;

use crate::field_type::FieldType;

/// Top-level error type for tabschema.
#[derive(Error, Debug)]
pub enum TabschemaError {
    /// The schema description could not be compiled.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// A source or field name was not defined by the schema.
    #[error("lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// A record could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// A numbered record could not be decoded.
    #[error("{0}")]
    Record(#[from] RecordError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A `format` tag that is not one of the known field types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown field type {tag:?}; expected one of {}", known_tags())]
pub struct UnknownTypeError {
    /// The tag as it appeared in the schema.
    pub tag: String,
}

impl UnknownTypeError {
    /// Create an error for the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }
}

fn known_tags() -> String {
    FieldType::all()
        .iter()
        .map(FieldType::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A raw token that cannot be decoded as its declared type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot decode {value:?} as {field_type}: {reason}")]
pub struct FormatError {
    /// Declared type of the field.
    pub field_type: FieldType,
    /// The offending raw text.
    pub value: String,
    /// Parser message.
    pub reason: String,
}

impl FormatError {
    /// Create a format error for `value` under `field_type`.
    pub fn new(field_type: FieldType, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field_type,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// A malformed schema description.
///
/// `row` is the 1-based data row of the schema file, header excluded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A required column is missing from the schema header.
    #[error("schema is missing required column {column:?}")]
    MissingColumn {
        /// Column name.
        column: String,
    },

    /// `field number` is not an integer of at least 1.
    #[error("schema row {row}: field number {value:?} is not an integer >= 1")]
    InvalidFieldNumber {
        /// Schema row.
        row: usize,
        /// Raw column text.
        value: String,
    },

    /// `format` is not a known type tag.
    #[error("schema row {row}: {source}")]
    UnknownType {
        /// Schema row.
        row: usize,
        /// Underlying lookup failure.
        source: UnknownTypeError,
    },

    /// `file pattern` yields an empty source key.
    #[error("schema row {row}: file pattern {pattern:?} has no source segment")]
    EmptySourceKey {
        /// Schema row.
        row: usize,
        /// Raw file pattern.
        pattern: String,
    },

    /// Two fields of one source declare the same field number.
    #[error("source '{source_key}': field number {field_number} declared by both '{first}' and '{second}'")]
    DuplicatePosition {
        /// Data source.
        source_key: String,
        /// The 1-based field number both rows declare.
        field_number: usize,
        /// Label of the first field.
        first: String,
        /// Label of the second field.
        second: String,
    },

    /// Two fields of one source share a label.
    #[error("source '{source_key}': field label '{label}' is declared more than once")]
    DuplicateLabel {
        /// Data source.
        source_key: String,
        /// Repeated label.
        label: String,
    },

    /// Field numbers of one source do not form 1..=N.
    #[error("source '{source_key}': field number {missing} is not declared")]
    PositionGap {
        /// Data source.
        source_key: String,
        /// The first missing 1-based field number.
        missing: usize,
    },

    /// Rows of one source declare different file patterns.
    #[error("source '{source_key}': conflicting file patterns {kept:?} and {rejected:?}")]
    ConflictingFilePattern {
        /// Data source.
        source_key: String,
        /// Pattern of the first row.
        kept: String,
        /// The differing pattern.
        rejected: String,
    },

    /// The schema text could not be parsed as delimited rows.
    #[error("malformed schema: {0}")]
    Malformed(String),
}

/// A caller asked for a name the schema does not define.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// No source has this key.
    #[error("'{name}' is not a source of this schema; available: {}", .available.join(", "))]
    UnknownSource {
        /// Requested key.
        name: String,
        /// Valid source keys.
        available: Vec<String>,
    },

    /// The source has no field with this label.
    #[error("source '{source_key}' has no field '{label}'; available: {}", .available.join(", "))]
    UnknownField {
        /// Data source.
        source_key: String,
        /// Requested label.
        label: String,
        /// Valid labels in position order.
        available: Vec<String>,
    },
}

impl LookupError {
    /// Returns the valid names attached to this error.
    pub fn available(&self) -> &[String] {
        match self {
            Self::UnknownSource { available, .. } | Self::UnknownField { available, .. } => {
                available
            }
        }
    }
}

/// A single record could not be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The record does not have one token per schema field.
    #[error("expected {expected} fields, found {actual}")]
    FieldCount {
        /// Fields in the schema.
        expected: usize,
        /// Tokens in the line.
        actual: usize,
    },

    /// A token was rejected by its field's decoder.
    #[error("field '{label}' (position {position}): {source}")]
    Format {
        /// Field label.
        label: String,
        /// Zero-based field position.
        position: usize,
        /// Decoder failure.
        source: FormatError,
    },
}

/// A decoding failure tied to its line in the input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {source}")]
pub struct RecordError {
    /// 1-based line number within the line source.
    pub line: usize,
    /// What went wrong.
    pub source: DecodeError,
}
