//! Decoded document model
//!
//! A [`Value`] is the in-memory tree a document source produces for one
//! preference file. It carries no behaviour beyond naming its own kind;
//! flattening and rendering live in [`crate::snapshot`].

pub mod source;

use chrono::{DateTime, Utc};

pub use source::{DecodeError, DocumentFormat, DocumentSource, FileDocumentSource};

/// One node of a decoded document.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Boolean(bool),
    Data(Vec<u8>),
    Unsigned(u64),
    Signed(i64),
    Float32(f32),
    Float64(f64),
    Date(DateTime<Utc>),
    /// Key/value pairs in decoder order
    Dictionary(Vec<(String, Value)>),
    Array(Vec<Value>),
    /// A node the decoder could not map onto any kind above
    Unrecognized { kind: String },
}

impl Value {
    /// Kind name used as the type tag of rendered leaf entries.
    pub fn kind(&self) -> &str {
        match self {
            Self::Text(_) => "text",
            Self::Boolean(_) => "boolean",
            Self::Data(_) => "data",
            Self::Unsigned(_) => "unsigned",
            Self::Signed(_) => "signed",
            Self::Float32(_) => "float32",
            Self::Float64(_) => "float64",
            Self::Date(_) => "date",
            Self::Dictionary(_) => "dictionary",
            Self::Array(_) => "array",
            Self::Unrecognized { kind } => kind,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Self::Dictionary(_) | Self::Array(_))
    }

    pub fn unrecognized(kind: impl Into<String>) -> Self {
        Self::Unrecognized { kind: kind.into() }
    }

    /// Build a dictionary from anything yielding `(key, value)` pairs.
    pub fn dictionary<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self::Dictionary(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Signed(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::Unsigned(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float64(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::Array(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::from("x").kind(), "text");
        assert_eq!(Value::from(true).kind(), "boolean");
        assert_eq!(Value::Data(vec![1]).kind(), "data");
        assert_eq!(Value::from(1u64).kind(), "unsigned");
        assert_eq!(Value::from(-1i64).kind(), "signed");
        assert_eq!(Value::Float32(1.5).kind(), "float32");
        assert_eq!(Value::from(1.5).kind(), "float64");
        assert_eq!(Value::Date(DateTime::<Utc>::UNIX_EPOCH).kind(), "date");
        assert_eq!(Value::Array(vec![]).kind(), "array");
        assert_eq!(Value::unrecognized("uid").kind(), "uid");
    }

    #[test]
    fn test_dictionary_keeps_order() {
        let value = Value::dictionary([("b", Value::from(1i64)), ("a", Value::from(2i64))]);

        match value {
            Value::Dictionary(entries) => {
                let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
                assert_eq!(keys, vec!["b", "a"]);
            }
            other => panic!("Expected dictionary, got {:?}", other),
        }
    }

    #[test]
    fn test_containers() {
        assert!(Value::Array(vec![]).is_container());
        assert!(Value::Dictionary(vec![]).is_container());
        assert!(!Value::from("leaf").is_container());
    }
}
