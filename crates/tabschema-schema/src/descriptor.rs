//! # Compiled Field & Source Descriptors
//!
//! `FieldDescriptor` is one resolved column; `SourceSchema` is the ordered
//! column list of one data source plus a label index built once at compile
//! time.
//!
//! ## Invariants
//!
//! Within a `SourceSchema`:
//! - `fields[i].position == i` for every `i` (sorted, contiguous from 0).
//! - Labels are unique.
//!
//! Only [`crate::compiler::SchemaCompiler`] constructs a `SourceSchema`,
//! after checking both.

use std::collections::HashMap;

use serde::Serialize;
use tabschema_core::{Decoder, FieldType, FormatError, TypedValue};

/// Compiled metadata for one field of a data source.
#[derive(Clone, Serialize)]
pub struct FieldDescriptor {
    /// Zero-based index of the field within a record.
    pub position: usize,
    /// Field name, from the schema's `content` column.
    pub label: String,
    /// Declared type.
    #[serde(rename = "format")]
    pub field_type: FieldType,
    /// Decoder selected by `field_type`.
    #[serde(skip)]
    pub decode: Decoder,
    /// Advisory: the schema says this field always carries a value.
    pub mandatory: bool,
}

impl FieldDescriptor {
    /// Build a descriptor, selecting the decoder for `field_type`.
    pub fn new(position: usize, label: impl Into<String>, field_type: FieldType, mandatory: bool) -> Self {
        Self {
            position,
            label: label.into(),
            field_type,
            decode: field_type.decoder(),
            mandatory,
        }
    }

    /// Decode one raw token of this field.
    pub fn decode(&self, raw: &str) -> Result<Option<TypedValue>, FormatError> {
        (self.decode)(raw)
    }
}

impl std::fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("position", &self.position)
            .field("label", &self.label)
            .field("field_type", &self.field_type)
            .field("mandatory", &self.mandatory)
            .finish()
    }
}

/// Reads one named column out of an already decoded record.
///
/// Holds the field's resolved position, so repeated reads never look the
/// label up again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldAccessor {
    position: usize,
}

impl FieldAccessor {
    /// Accessor for the field at `position`.
    pub fn new(position: usize) -> Self {
        Self { position }
    }

    /// The zero-based position this accessor reads.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The field's value in `record`; `None` if absent or out of range.
    pub fn get<'r>(&self, record: &'r [Option<TypedValue>]) -> Option<&'r TypedValue> {
        record.get(self.position).and_then(Option::as_ref)
    }
}

/// The compiled schema of one data source.
#[derive(Debug, Clone)]
pub struct SourceSchema {
    source_key: String,
    file_pattern: String,
    fields: Vec<FieldDescriptor>,
    index: HashMap<String, usize>,
}

impl SourceSchema {
    /// Assemble a source from fields already sorted, contiguous, and
    /// uniquely labeled.
    pub(crate) fn new(source_key: String, file_pattern: String, fields: Vec<FieldDescriptor>) -> Self {
        let index = fields
            .iter()
            .map(|f| (f.label.clone(), f.position))
            .collect();
        Self {
            source_key,
            file_pattern,
            fields,
            index,
        }
    }

    /// The source key (first segment of the file pattern).
    pub fn source_key(&self) -> &str {
        &self.source_key
    }

    /// The file pattern of the first schema row for this source.
    pub fn file_pattern(&self) -> &str {
        &self.file_pattern
    }

    /// Fields in position order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Number of fields a record of this source has.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if the source declares no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Labels in position order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.label.as_str())
    }

    /// Zero-based position of the field called `label`.
    pub fn position_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// The field called `label`.
    pub fn field(&self, label: &str) -> Option<&FieldDescriptor> {
        self.position_of(label).map(|p| &self.fields[p])
    }

    /// Accessor for the field called `label`.
    pub fn accessor(&self, label: &str) -> Option<FieldAccessor> {
        self.position_of(label).map(FieldAccessor::new)
    }
}
