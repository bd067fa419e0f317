//! # tabschema-schema — Schema Compilation & Record Decoding
//!
//! Turns a flat schema description (one row per field, grouped by data
//! source through the `file pattern` column) into compiled per-source field
//! lists, and decodes delimited text records against them.
//!
//! ## Pipeline
//!
//! ```text
//! schema rows ──► SchemaCompiler ──► SourceSchema (per source)
//!                                        │  owned by SchemaCatalog
//!                                        ▼
//! raw lines ─────────────────────► RecordDecoder / RecordStream ──► Record
//! ```
//!
//! - [`row`] parses the schema CSV into [`SchemaRow`]s.
//! - [`compiler`] groups, resolves, orders, and checks them.
//! - [`catalog`] is the handle the I/O layer holds: lookup by source,
//!   field indices, accessors, decoders.
//! - [`decoder`] decodes one line, or lazily a whole line source.
//!
//! ## Crate Policy
//!
//! - Depends only on `tabschema-core` internally.
//! - Does not discover or open data files. Callers supply lines.
//! - Compiled schemas are immutable and `Send + Sync`; decoding never
//!   mutates them, so they can be shared across threads without locks.

#![warn(missing_docs)]

pub mod catalog;
pub mod compiler;
pub mod config;
pub mod decoder;
pub mod descriptor;
pub mod row;

pub use catalog::{CatalogError, SchemaCatalog};
pub use compiler::SchemaCompiler;
pub use config::{CatalogConfig, ConfigError, PatternPolicy, DEFAULT_DELIMITER};
pub use decoder::{RecordDecoder, RecordStream, SkipErrors};
pub use descriptor::{FieldAccessor, FieldDescriptor, SourceSchema};
pub use row::{parse_rows, SchemaRow};
