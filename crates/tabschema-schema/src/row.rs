//! # Schema Rows
//!
//! The raw, loosely typed rows of a schema description. One row describes
//! one field of one data source:
//!
//! | column | meaning |
//! |--------|---------|
//! | `field number` | 1-based position within the record |
//! | `content` | field label |
//! | `format` | type tag, see [`tabschema_core::FieldType`] |
//! | `mandatory` | `YES`, or anything else (optional column) |
//! | `file pattern` | `<source>/<rest>` |
//!
//! Extra columns are ignored. Values are kept as text here; the compiler
//! is what rejects bad field numbers and unknown formats.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tabschema_core::SchemaError;

/// Header of the position column.
pub const FIELD_NUMBER: &str = "field number";
/// Header of the label column.
pub const CONTENT: &str = "content";
/// Header of the type tag column.
pub const FORMAT: &str = "format";
/// Header of the mandatory flag column.
pub const MANDATORY: &str = "mandatory";
/// Header of the file pattern column.
pub const FILE_PATTERN: &str = "file pattern";

/// Columns a schema header must contain.
pub const REQUIRED_COLUMNS: [&str; 4] = [FIELD_NUMBER, CONTENT, FORMAT, FILE_PATTERN];

/// One uncompiled schema row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaRow {
    /// 1-based position of the field, as written.
    #[serde(rename = "field number")]
    pub field_number: String,
    /// Field label.
    pub content: String,
    /// Type tag, e.g. `INTEGER`.
    pub format: String,
    /// `YES` marks the field mandatory; anything else, or a missing
    /// column, does not.
    #[serde(default)]
    pub mandatory: String,
    /// `<source key>/<file name pattern>`.
    #[serde(rename = "file pattern")]
    pub file_pattern: String,
}

impl SchemaRow {
    /// Build a row from its column values.
    pub fn new(
        field_number: impl Into<String>,
        content: impl Into<String>,
        format: impl Into<String>,
        mandatory: impl Into<String>,
        file_pattern: impl Into<String>,
    ) -> Self {
        Self {
            field_number: field_number.into(),
            content: content.into(),
            format: format.into(),
            mandatory: mandatory.into(),
            file_pattern: file_pattern.into(),
        }
    }

    /// Build a row from a column-name → value mapping.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::MissingColumn` if a required column is absent.
    /// A missing `mandatory` column reads as not mandatory.
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self, SchemaError> {
        let column = |name: &str| {
            map.get(name)
                .cloned()
                .ok_or_else(|| SchemaError::MissingColumn {
                    column: name.to_string(),
                })
        };
        Ok(Self {
            field_number: column(FIELD_NUMBER)?,
            content: column(CONTENT)?,
            format: column(FORMAT)?,
            mandatory: map.get(MANDATORY).cloned().unwrap_or_default(),
            file_pattern: column(FILE_PATTERN)?,
        })
    }

    /// The data source this row belongs to: the file pattern up to its
    /// first `/`, or the whole pattern when it has none.
    pub fn source_key(&self) -> &str {
        self.file_pattern
            .split_once('/')
            .map_or(self.file_pattern.as_str(), |(key, _)| key)
    }

    /// Whether the row declares its field mandatory.
    pub fn is_mandatory(&self) -> bool {
        self.mandatory == "YES"
    }
}

/// Parse schema CSV text (header row required) into rows.
///
/// Header names are trimmed; values are not.
///
/// # Errors
///
/// Returns `SchemaError::MissingColumn` when the header lacks a required
/// column and `SchemaError::Malformed` when the text is not valid CSV.
pub fn parse_rows(text: &str) -> Result<Vec<SchemaRow>, SchemaError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| SchemaError::Malformed(e.to_string()))?
        .clone();

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(SchemaError::MissingColumn {
                column: column.to_string(),
            });
        }
    }

    reader
        .deserialize::<SchemaRow>()
        .map(|row| row.map_err(|e| SchemaError::Malformed(e.to_string())))
        .collect()
}
