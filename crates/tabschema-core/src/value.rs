//! # Typed Field Values
//!
//! The decoded representation of one field of a delimited record.

use serde::{Deserialize, Serialize};

/// A decoded, strongly typed field value.
///
/// Serializes untagged, so a record renders as a plain JSON array:
/// `[7, "alice", 3.5, true, null]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypedValue {
    /// Signed 64-bit integer.
    Integer(i64),
    /// 64-bit floating point.
    Float(f64),
    /// Boolean decoded from an integer flag.
    Boolean(bool),
    /// Raw text, including hash-style identifiers.
    String(String),
}

/// One decoded record, in schema position order. `None` marks an absent field.
pub type Record = Vec<Option<TypedValue>>;

impl TypedValue {
    /// Returns the inner integer, if this is an `Integer`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the inner float, if this is a `Float`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the inner boolean, if this is a `Boolean`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the inner text, if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Boolean(_) => "boolean",
            Self::String(_) => "string",
        }
    }
}

impl std::fmt::Display for TypedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            // Booleans come from integer flags, so render them the same way.
            Self::Boolean(b) => f.write_str(if *b { "1" } else { "0" }),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<i64> for TypedValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for TypedValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for TypedValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<&str> for TypedValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for TypedValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_match_variant() {
        assert_eq!(TypedValue::Integer(7).as_i64(), Some(7));
        assert_eq!(TypedValue::Integer(7).as_str(), None);
        assert_eq!(TypedValue::Float(1.5).as_f64(), Some(1.5));
        assert_eq!(TypedValue::Boolean(true).as_bool(), Some(true));
        assert_eq!(TypedValue::from("abc").as_str(), Some("abc"));
    }

    #[test]
    fn display_matches_source_text() {
        assert_eq!(TypedValue::Integer(-3).to_string(), "-3");
        assert_eq!(TypedValue::Float(2.5).to_string(), "2.5");
        assert_eq!(TypedValue::Boolean(true).to_string(), "1");
        assert_eq!(TypedValue::Boolean(false).to_string(), "0");
        assert_eq!(TypedValue::from("x y").to_string(), "x y");
    }

    #[test]
    fn record_serializes_as_plain_json_array() {
        let record: Record = vec![
            Some(TypedValue::Integer(7)),
            Some(TypedValue::from("alice")),
            Some(TypedValue::Boolean(false)),
            None,
        ];
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"[7,"alice",false,null]"#);
    }

    #[test]
    fn kind_names() {
        assert_eq!(TypedValue::Integer(0).kind(), "integer");
        assert_eq!(TypedValue::Float(0.0).kind(), "float");
        assert_eq!(TypedValue::Boolean(true).kind(), "boolean");
        assert_eq!(TypedValue::from("").kind(), "string");
    }
}
