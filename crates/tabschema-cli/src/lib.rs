//! # tabschema-cli — Schema Catalog Command-Line Interface
//!
//! Provides the `tabschema` binary: load a schema description, inspect the
//! compiled sources, and decode the data files of one source to JSON lines.
//!
//! ## Subcommands
//!
//! - `tabschema sources`: one line per source: key, file pattern, field count.
//! - `tabschema fields <source>`: one JSON object per field.
//! - `tabschema index <source> <label>`: zero-based position of a field.
//! - `tabschema decode <source>`: decode `<data-root>/<source>/*`.
//!
//! ```bash
//! tabschema --schema trace/schema.csv sources
//! tabschema --schema trace/schema.csv decode machine_events --limit 10
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers live here and write to
//!   any `io::Write`, so they can be tested without a process.
//! - Handlers return `anyhow::Result<u8>`: the exit code on success.
//! - Logs go to stderr; stdout carries only command output.

pub mod catalog;
pub mod decode;
pub mod inspect;
