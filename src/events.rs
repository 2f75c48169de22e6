use std::path::PathBuf;
use std::time::SystemTime;
use serde::{Deserialize, Serialize};

use crate::diff::DiffStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    Created,
    Modified,
    Removed,
    Other,
}

impl NotificationKind {
    /// Whether the document's content may now differ from the last snapshot
    pub fn is_content_change(&self) -> bool {
        matches!(self, Self::Created | Self::Modified)
    }
}

/// A raw change reported by the filesystem for one path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub path: PathBuf,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn new(path: impl Into<PathBuf>, kind: NotificationKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// A detected change to a tracked document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChange {
    pub path: PathBuf,
    pub timestamp: SystemTime,
    pub diff: String,
    pub stats: DiffStats,
}

impl DocumentChange {
    pub fn new(path: PathBuf, diff: String, stats: DiffStats) -> Self {
        Self {
            path,
            timestamp: SystemTime::now(),
            diff,
            stats,
        }
    }

    /// Single-line JSON form used by the `json` output mode
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
