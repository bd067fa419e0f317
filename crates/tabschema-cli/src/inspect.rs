//! # Inspection Commands
//!
//! `sources`, `fields`, and `index`: read-only views of a compiled catalog.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use tabschema_schema::SchemaCatalog;

/// Arguments of `tabschema fields`.
#[derive(Args, Debug)]
pub struct FieldsArgs {
    /// Source key, e.g. `machine_events`.
    pub source: String,
}

/// Arguments of `tabschema index`.
#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Source key.
    pub source: String,
    /// Field label, e.g. `machine ID`.
    pub label: String,
}

/// Print one tab-separated line per source: key, file pattern, field count.
pub fn run_sources(catalog: &SchemaCatalog, out: &mut impl Write) -> Result<u8> {
    for schema in catalog.iter() {
        writeln!(
            out,
            "{}\t{}\t{}",
            schema.source_key(),
            schema.file_pattern(),
            schema.len()
        )?;
    }
    Ok(0)
}

/// Print the fields of a source as JSON lines, in position order.
pub fn run_fields(args: &FieldsArgs, catalog: &SchemaCatalog, out: &mut impl Write) -> Result<u8> {
    let schema = catalog.schema_for(&args.source)?;
    for field in schema.fields() {
        serde_json::to_writer(&mut *out, field)?;
        writeln!(out)?;
    }
    Ok(0)
}

/// Print the zero-based position of a field.
pub fn run_index(args: &IndexArgs, catalog: &SchemaCatalog, out: &mut impl Write) -> Result<u8> {
    let position = catalog.index_of_field(&args.source, &args.label)?;
    writeln!(out, "{position}")?;
    Ok(0)
}
