//! # tabschema-core — Foundational Types
//!
//! Leaf crate of the tabschema workspace. Defines the value model every
//! decoded record is built from and the fixed set of field types a schema
//! may declare.
//!
//! ## Key Design Principles
//!
//! 1. **Absent is not empty.** A missing field decodes to `None`, never to
//!    an empty string. Records are `Vec<Option<TypedValue>>`.
//!
//! 2. **Decoder dispatch as data.** `FieldType` is a closed enum and each
//!    variant maps to a plain `fn` pointer. Adding a type forces every
//!    `match` to handle it at compile time.
//!
//! 3. **Structured errors.** Every failure names the offending value, and
//!    lookup failures carry the list of valid names.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `tabschema-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod field_type;
pub mod value;

pub use error::{
    DecodeError, FormatError, LookupError, RecordError, SchemaError, TabschemaError,
    UnknownTypeError,
};
pub use field_type::{decoder_for, Decoder, FieldType};
pub use value::{Record, TypedValue};
