pub mod cli;
pub mod config;
pub mod correlator;
pub mod diff;
pub mod discovery;
pub mod document;
pub mod events;
pub mod output;
pub mod snapshot;
pub mod watcher;

pub use correlator::{ChangeCorrelator, CorrelatorState};
pub use diff::diff;
pub use discovery::DocumentDiscovery;
pub use document::{DecodeError, DocumentSource, FileDocumentSource, Value};
pub use events::*;
pub use snapshot::{flatten, render, Diagnostic, LeafEntry, Path, PathSegment, Snapshot};
pub use watcher::PreferenceWatcher;
