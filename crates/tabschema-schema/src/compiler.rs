//! # Schema Compiler
//!
//! Turns uncompiled [`SchemaRow`]s into one [`SourceSchema`] per data source.
//!
//! ## Algorithm
//!
//! 1. Each row's source key is its file pattern up to the first `/`.
//! 2. Rows are grouped by source key. The first row seen fixes the source's
//!    file pattern; later rows with a different pattern are handled by the
//!    configured [`PatternPolicy`].
//! 3. Each row resolves to a [`FieldDescriptor`]: `position` is the field
//!    number minus one, the decoder comes from the `format` tag, and
//!    `mandatory` is true only for the literal `YES`.
//! 4. Each group is sorted by position and checked: no duplicate positions,
//!    no duplicate labels, no gaps in `0..N`.
//!
//! Compilation is all-or-nothing. The first error aborts it and nothing
//! partial is returned. With consistent file patterns the result does not
//! depend on the order of the input rows.

use std::collections::{BTreeMap, HashSet};

use tabschema_core::{FieldType, SchemaError};

use crate::config::PatternPolicy;
use crate::descriptor::{FieldDescriptor, SourceSchema};
use crate::row::SchemaRow;

/// Compiles schema rows into per-source schemas.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaCompiler {
    pattern_policy: PatternPolicy,
}

struct PendingSource {
    file_pattern: String,
    fields: Vec<FieldDescriptor>,
}

impl SchemaCompiler {
    /// Create a compiler applying `pattern_policy` to conflicting file patterns.
    pub fn new(pattern_policy: PatternPolicy) -> Self {
        Self { pattern_policy }
    }

    /// The policy applied to conflicting file patterns.
    pub fn pattern_policy(&self) -> PatternPolicy {
        self.pattern_policy
    }

    /// Compile `rows` into a map from source key to schema.
    ///
    /// # Errors
    ///
    /// Returns the first `SchemaError` found; see the module docs for the
    /// checks performed. Row numbers in errors are 1-based indices into
    /// `rows`.
    pub fn compile(&self, rows: &[SchemaRow]) -> Result<BTreeMap<String, SourceSchema>, SchemaError> {
        let mut pending: BTreeMap<String, PendingSource> = BTreeMap::new();

        for (index, row) in rows.iter().enumerate() {
            let row_number = index + 1;
            let source_key = row.source_key();
            if source_key.is_empty() {
                return Err(SchemaError::EmptySourceKey {
                    row: row_number,
                    pattern: row.file_pattern.clone(),
                });
            }

            let field = compile_field(row_number, row)?;

            let source = pending
                .entry(source_key.to_string())
                .or_insert_with(|| PendingSource {
                    file_pattern: row.file_pattern.clone(),
                    fields: Vec::new(),
                });

            if source.file_pattern != row.file_pattern {
                match self.pattern_policy {
                    PatternPolicy::Reject => {
                        return Err(SchemaError::ConflictingFilePattern {
                            source_key: source_key.to_string(),
                            kept: source.file_pattern.clone(),
                            rejected: row.file_pattern.clone(),
                        });
                    }
                    PatternPolicy::FirstWins => {
                        tracing::warn!(
                            source = source_key,
                            kept = %source.file_pattern,
                            ignored = %row.file_pattern,
                            row = row_number,
                            "conflicting file pattern ignored; first pattern wins"
                        );
                    }
                }
            }

            source.fields.push(field);
        }

        pending
            .into_iter()
            .map(|(key, source)| {
                let fields = order_fields(&key, source.fields)?;
                tracing::debug!(
                    source = %key,
                    pattern = %source.file_pattern,
                    fields = fields.len(),
                    "compiled source schema"
                );
                let schema = SourceSchema::new(key.clone(), source.file_pattern, fields);
                Ok((key, schema))
            })
            .collect()
    }
}

/// Resolve one row into a field descriptor.
fn compile_field(row_number: usize, row: &SchemaRow) -> Result<FieldDescriptor, SchemaError> {
    let field_number = row
        .field_number
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| *n >= 1)
        .ok_or_else(|| SchemaError::InvalidFieldNumber {
            row: row_number,
            value: row.field_number.clone(),
        })?;

    let field_type = row
        .format
        .parse::<FieldType>()
        .map_err(|source| SchemaError::UnknownType {
            row: row_number,
            source,
        })?;

    Ok(FieldDescriptor::new(
        field_number - 1,
        row.content.clone(),
        field_type,
        row.is_mandatory(),
    ))
}

/// Sort one source's fields and check positions and labels.
fn order_fields(source_key: &str, mut fields: Vec<FieldDescriptor>) -> Result<Vec<FieldDescriptor>, SchemaError> {
    // Stable, so "first" in a duplicate error is the earlier row.
    fields.sort_by_key(|f| f.position);

    for pair in fields.windows(2) {
        if pair[0].position == pair[1].position {
            return Err(SchemaError::DuplicatePosition {
                source_key: source_key.to_string(),
                field_number: pair[0].position + 1,
                first: pair[0].label.clone(),
                second: pair[1].label.clone(),
            });
        }
    }

    if let Some(missing) = fields
        .iter()
        .enumerate()
        .find_map(|(expected, f)| (f.position != expected).then_some(expected))
    {
        return Err(SchemaError::PositionGap {
            source_key: source_key.to_string(),
            missing: missing + 1,
        });
    }

    let mut seen = HashSet::with_capacity(fields.len());
    for f in &fields {
        if !seen.insert(f.label.as_str()) {
            return Err(SchemaError::DuplicateLabel {
                source_key: source_key.to_string(),
                label: f.label.clone(),
            });
        }
    }

    Ok(fields)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn field_type() -> impl Strategy<Value = FieldType> {
        prop::sample::select(FieldType::all().to_vec())
    }

    /// Valid rows for up to three sources, each with contiguous field numbers
    /// and unique labels.
    fn valid_rows() -> impl Strategy<Value = Vec<SchemaRow>> {
        prop::collection::vec(
            prop::collection::vec((field_type(), any::<bool>()), 1..8),
            1..4,
        )
        .prop_map(|sources| {
            let mut rows = Vec::new();
            for (s, fields) in sources.iter().enumerate() {
                for (i, (t, mandatory)) in fields.iter().enumerate() {
                    rows.push(SchemaRow::new(
                        (i + 1).to_string(),
                        format!("field_{i}"),
                        t.as_str(),
                        if *mandatory { "YES" } else { "NO" },
                        format!("source_{s}/part-*.csv"),
                    ));
                }
            }
            rows
        })
    }

    fn shape(sources: &BTreeMap<String, SourceSchema>) -> Vec<(String, Vec<(usize, String, FieldType, bool)>)> {
        sources
            .iter()
            .map(|(k, s)| {
                let fields = s
                    .fields()
                    .iter()
                    .map(|f| (f.position, f.label.clone(), f.field_type, f.mandatory))
                    .collect();
                (k.clone(), fields)
            })
            .collect()
    }

    proptest! {
        /// Compiled fields are sorted, contiguous from 0, and uniquely labeled.
        #[test]
        fn compiled_fields_are_ordered_and_contiguous(rows in valid_rows()) {
            let sources = SchemaCompiler::default().compile(&rows).unwrap();
            for schema in sources.values() {
                for (i, f) in schema.fields().iter().enumerate() {
                    prop_assert_eq!(f.position, i);
                    prop_assert_eq!(schema.position_of(&f.label), Some(i));
                }
                let labels: HashSet<&str> = schema.labels().collect();
                prop_assert_eq!(labels.len(), schema.len());
            }
        }

        /// Input row order does not change the compiled result.
        #[test]
        fn row_order_is_irrelevant(
            (rows, shuffled) in valid_rows().prop_flat_map(|rows| {
                let shuffled = Just(rows.clone()).prop_shuffle();
                (Just(rows), shuffled)
            })
        ) {
            let a = SchemaCompiler::default().compile(&rows).unwrap();
            let b = SchemaCompiler::default().compile(&shuffled).unwrap();
            prop_assert_eq!(shape(&a), shape(&b));
        }
    }
}
