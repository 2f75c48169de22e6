//! Loading documents from disk
//!
//! The correlator only sees the [`DocumentSource`] trait; [`FileDocumentSource`]
//! is the stock implementation that picks a decoder from the file extension.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};

use super::Value;

/// Errors raised while turning a file into a [`Value`] tree.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error decoding property list {}: {source}", path.display())]
    Plist {
        path: PathBuf,
        #[source]
        source: plist::Error,
    },

    #[error("error decoding JSON {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("error decoding TOML {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unsupported document format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },
}

impl DecodeError {
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. }
            | Self::Plist { path, .. }
            | Self::Json { path, .. }
            | Self::Toml { path, .. }
            | Self::UnsupportedFormat { path } => path,
        }
    }
}

/// Anything that can produce the current decoded content of a document.
pub trait DocumentSource {
    fn load(&self, path: &Path) -> Result<Value, DecodeError>;
}

/// On-disk formats understood by [`FileDocumentSource`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Plist,
    Json,
    Toml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "plist" => Some(Self::Plist),
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Reads documents straight from the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileDocumentSource;

impl FileDocumentSource {
    pub fn new() -> Self {
        Self
    }

    fn read_text(path: &Path) -> Result<String, DecodeError> {
        std::fs::read_to_string(path).map_err(|source| DecodeError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl DocumentSource for FileDocumentSource {
    fn load(&self, path: &Path) -> Result<Value, DecodeError> {
        match DocumentFormat::from_path(path) {
            Some(DocumentFormat::Plist) => plist::Value::from_file(path)
                .map(from_plist)
                .map_err(|source| DecodeError::Plist {
                    path: path.to_path_buf(),
                    source,
                }),
            Some(DocumentFormat::Json) => {
                let content = Self::read_text(path)?;
                serde_json::from_str::<serde_json::Value>(&content)
                    .map(from_json)
                    .map_err(|source| DecodeError::Json {
                        path: path.to_path_buf(),
                        source,
                    })
            }
            Some(DocumentFormat::Toml) => {
                let content = Self::read_text(path)?;
                content
                    .parse::<toml::Table>()
                    .map(|table| from_toml(toml::Value::Table(table)))
                    .map_err(|source| DecodeError::Toml {
                        path: path.to_path_buf(),
                        source,
                    })
            }
            None => Err(DecodeError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

fn from_plist(value: plist::Value) -> Value {
    match value {
        plist::Value::String(s) => Value::Text(s),
        plist::Value::Boolean(b) => Value::Boolean(b),
        plist::Value::Data(bytes) => Value::Data(bytes),
        plist::Value::Integer(i) => match (i.as_signed(), i.as_unsigned()) {
            (Some(signed), _) => Value::Signed(signed),
            (None, Some(unsigned)) => Value::Unsigned(unsigned),
            (None, None) => Value::unrecognized("integer"),
        },
        plist::Value::Real(f) => Value::Float64(f),
        plist::Value::Date(date) => Value::Date(DateTime::<Utc>::from(SystemTime::from(date))),
        plist::Value::Dictionary(dict) => Value::Dictionary(
            dict.into_iter()
                .map(|(key, value)| (key, from_plist(value)))
                .collect(),
        ),
        plist::Value::Array(items) => Value::Array(items.into_iter().map(from_plist).collect()),
        plist::Value::Uid(_) => Value::unrecognized("uid"),
        _ => Value::unrecognized("unknown"),
    }
}

fn from_json(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::String(s) => Value::Text(s),
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => {
            if let Some(signed) = n.as_i64() {
                Value::Signed(signed)
            } else if let Some(unsigned) = n.as_u64() {
                Value::Unsigned(unsigned)
            } else if let Some(float) = n.as_f64() {
                Value::Float64(float)
            } else {
                Value::unrecognized("number")
            }
        }
        serde_json::Value::Object(map) => Value::Dictionary(
            map.into_iter()
                .map(|(key, value)| (key, from_json(value)))
                .collect(),
        ),
        serde_json::Value::Array(items) => Value::Array(items.into_iter().map(from_json).collect()),
        serde_json::Value::Null => Value::unrecognized("null"),
    }
}

fn from_toml(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::Text(s),
        toml::Value::Boolean(b) => Value::Boolean(b),
        toml::Value::Integer(i) => Value::Signed(i),
        toml::Value::Float(f) => Value::Float64(f),
        toml::Value::Datetime(dt) => {
            // Local dates and times have no offset and cannot be placed on the UTC timeline
            match DateTime::parse_from_rfc3339(&dt.to_string()) {
                Ok(parsed) if dt.offset.is_some() => Value::Date(parsed.with_timezone(&Utc)),
                _ => Value::unrecognized("datetime"),
            }
        }
        toml::Value::Table(table) => Value::Dictionary(
            table
                .into_iter()
                .map(|(key, value)| (key, from_toml(value)))
                .collect(),
        ),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(from_toml).collect()),
    }
}
