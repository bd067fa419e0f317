//! # Field Types — Decoder Registry
//!
//! Defines the `FieldType` enum with the five type tags a schema row may
//! declare in its `format` column, and the pure decoding function bound to
//! each one.
//!
//! ## Decoding Rules
//!
//! | tag | empty text | otherwise |
//! |-----|------------|-----------|
//! | `STRING_HASH` | absent | the text unchanged |
//! | `INTEGER` | absent | `i64`, or `FormatError` |
//! | `FLOAT` | absent | finite `f64`, or `FormatError` (also for `NaN`, `inf`) |
//! | `BOOLEAN` | absent | integer flag: nonzero is true, or `FormatError` |
//! | `STRING_HASH_OR_INTEGER` | absent | `i64` if it parses, else the text; never fails |
//!
//! Numeric parsing ignores surrounding ASCII whitespace. String decoders
//! return the text exactly as given.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FormatError, UnknownTypeError};
use crate::value::TypedValue;

/// A pure decoding function from raw field text to a typed value.
///
/// `Ok(None)` means the field is absent.
pub type Decoder = fn(&str) -> Result<Option<TypedValue>, FormatError>;

/// The fixed set of declared field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    /// Opaque text, typically a hashed identifier.
    StringHash,
    /// Signed 64-bit integer.
    Integer,
    /// 64-bit floating point.
    Float,
    /// Integer flag interpreted as a boolean.
    Boolean,
    /// Integer when the text parses as one, otherwise opaque text.
    StringHashOrInteger,
}

impl FieldType {
    /// Returns all field types in declaration order.
    pub fn all() -> &'static [FieldType] {
        &[
            Self::StringHash,
            Self::Integer,
            Self::Float,
            Self::Boolean,
            Self::StringHashOrInteger,
        ]
    }

    /// Returns the tag used in the schema's `format` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StringHash => "STRING_HASH",
            Self::Integer => "INTEGER",
            Self::Float => "FLOAT",
            Self::Boolean => "BOOLEAN",
            Self::StringHashOrInteger => "STRING_HASH_OR_INTEGER",
        }
    }

    /// Returns the decoding function for this type.
    pub fn decoder(&self) -> Decoder {
        match self {
            Self::StringHash => decode_string_hash,
            Self::Integer => decode_integer,
            Self::Float => decode_float,
            Self::Boolean => decode_boolean,
            Self::StringHashOrInteger => decode_string_hash_or_integer,
        }
    }

    /// Decodes one raw field with this type's decoder.
    pub fn decode(&self, raw: &str) -> Result<Option<TypedValue>, FormatError> {
        (self.decoder())(raw)
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = UnknownTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STRING_HASH" => Ok(Self::StringHash),
            "INTEGER" => Ok(Self::Integer),
            "FLOAT" => Ok(Self::Float),
            "BOOLEAN" => Ok(Self::Boolean),
            "STRING_HASH_OR_INTEGER" => Ok(Self::StringHashOrInteger),
            other => Err(UnknownTypeError::new(other)),
        }
    }
}

/// Looks up the decoder for a `format` tag.
///
/// # Errors
///
/// Returns `UnknownTypeError` if `tag` is not one of the five known tags.
pub fn decoder_for(tag: &str) -> Result<Decoder, UnknownTypeError> {
    tag.parse::<FieldType>().map(|t| t.decoder())
}

fn decode_string_hash(raw: &str) -> Result<Option<TypedValue>, FormatError> {
    if raw.is_empty() {
        return Ok(None);
    }
    Ok(Some(TypedValue::String(raw.to_string())))
}

fn decode_integer(raw: &str) -> Result<Option<TypedValue>, FormatError> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.trim()
        .parse::<i64>()
        .map(|i| Some(TypedValue::Integer(i)))
        .map_err(|e| FormatError::new(FieldType::Integer, raw, e.to_string()))
}

fn decode_float(raw: &str) -> Result<Option<TypedValue>, FormatError> {
    if raw.is_empty() {
        return Ok(None);
    }
    let x = raw
        .trim()
        .parse::<f64>()
        .map_err(|e| FormatError::new(FieldType::Float, raw, e.to_string()))?;
    if !x.is_finite() {
        return Err(FormatError::new(FieldType::Float, raw, "not a finite number"));
    }
    Ok(Some(TypedValue::Float(x)))
}

fn decode_boolean(raw: &str) -> Result<Option<TypedValue>, FormatError> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.trim()
        .parse::<i64>()
        .map(|flag| Some(TypedValue::Boolean(flag != 0)))
        .map_err(|e| FormatError::new(FieldType::Boolean, raw, e.to_string()))
}

fn decode_string_hash_or_integer(raw: &str) -> Result<Option<TypedValue>, FormatError> {
    if raw.is_empty() {
        return Ok(None);
    }
    Ok(Some(match raw.trim().parse::<i64>() {
        Ok(i) => TypedValue::Integer(i),
        Err(_) => TypedValue::String(raw.to_string()),
    }))
}
