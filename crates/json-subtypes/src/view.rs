//! Read-only view over a parsed JSON value.
//!
//! The resolver never parses JSON itself. Everything it needs from a document
//! goes through [`JsonView`], so the same algorithm runs over any tree the host
//! framework hands it. [`serde_json::Value`] implements the view out of the box.

use std::fmt;

use serde_json::Value;

/// The kind of a JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Object,
    Array,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Object => "object",
            Self::Array => "array",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Navigable JSON value.
///
/// Object entries must be yielded in document order: case-insensitive lookups
/// pick the first matching key in that order.
pub trait JsonView {
    fn kind(&self) -> ValueKind;

    /// Exact, single-level key lookup. `None` for missing keys and non-objects.
    fn get(&self, key: &str) -> Option<&Self>;

    /// Object entries in document order. Empty for non-objects.
    fn entries(&self) -> impl Iterator<Item = (&str, &Self)>;

    /// Array elements in order. Empty for non-arrays.
    fn elements(&self) -> impl Iterator<Item = &Self>;

    fn as_str(&self) -> Option<&str>;

    fn as_bool(&self) -> Option<bool>;

    fn as_i64(&self) -> Option<i64>;

    fn as_f64(&self) -> Option<f64>;

    /// Textual form of a number, as written in the document where available.
    fn number_text(&self) -> Option<String>;

    fn is_null(&self) -> bool {
        self.kind() == ValueKind::Null
    }

    fn is_object(&self) -> bool {
        self.kind() == ValueKind::Object
    }
}

impl JsonView for Value {
    fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Object(_) => ValueKind::Object,
            Value::Array(_) => ValueKind::Array,
        }
    }

    fn get(&self, key: &str) -> Option<&Self> {
        self.as_object()?.get(key)
    }

    fn entries(&self) -> impl Iterator<Item = (&str, &Self)> {
        self.as_object()
            .into_iter()
            .flat_map(|map| map.iter().map(|(k, v)| (k.as_str(), v)))
    }

    fn elements(&self) -> impl Iterator<Item = &Self> {
        self.as_array().into_iter().flatten()
    }

    fn as_str(&self) -> Option<&str> {
        Value::as_str(self)
    }

    fn as_bool(&self) -> Option<bool> {
        Value::as_bool(self)
    }

    fn as_i64(&self) -> Option<i64> {
        Value::as_i64(self)
    }

    fn as_f64(&self) -> Option<f64> {
        Value::as_f64(self)
    }

    fn number_text(&self) -> Option<String> {
        match self {
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}
