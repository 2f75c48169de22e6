//! Change correlation
//!
//! The correlator keeps the last snapshot of every tracked document and
//! turns change notifications into before/after diffs. It is driven by a
//! single consumer loop, so the state needs no locking.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use crate::diff::{DiffFormatter, DiffGenerator};
use crate::document::DocumentSource;
use crate::events::{DocumentChange, Notification};
use crate::snapshot::{flatten, Snapshot};

/// Last known snapshot per tracked document
#[derive(Debug, Default)]
pub struct CorrelatorState {
    snapshots: HashMap<PathBuf, Snapshot>,
}

impl CorrelatorState {
    pub fn get(&self, path: &Path) -> Option<&Snapshot> {
        self.snapshots.get(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.snapshots.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.snapshots.keys()
    }

    fn replace(&mut self, path: PathBuf, snapshot: Snapshot) -> Option<Snapshot> {
        self.snapshots.insert(path, snapshot)
    }
}

pub struct ChangeCorrelator<S: DocumentSource> {
    source: S,
    generator: DiffGenerator,
    state: CorrelatorState,
}

impl<S: DocumentSource> ChangeCorrelator<S> {
    pub fn new(source: S) -> Self {
        Self::with_generator(source, DiffGenerator::default())
    }

    pub fn with_generator(source: S, generator: DiffGenerator) -> Self {
        Self {
            source,
            generator,
            state: CorrelatorState::default(),
        }
    }

    pub fn state(&self) -> &CorrelatorState {
        &self.state
    }

    /// Load and flatten every document once. Documents that fail to decode
    /// are logged and never tracked. Returns the number now tracked.
    pub fn capture_baselines<I, P>(&mut self, documents: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        for path in documents {
            let path = path.into();
            match self.source.load(&path) {
                Ok(value) => {
                    let snapshot = flatten(&value);
                    tracing::debug!("Baseline for {}: {} entries", path.display(), snapshot.len());
                    self.state.replace(path, snapshot);
                }
                Err(err) => {
                    tracing::warn!("Skipping {}: {}", path.display(), err);
                }
            }
        }
        self.state.len()
    }

    /// Process one notification.
    ///
    /// Returns the change when the document is tracked, decodes, and its
    /// canonical form differs from the stored snapshot. The stored snapshot
    /// is replaced on every successful decode, even when nothing changed.
    pub fn handle(&mut self, notification: &Notification) -> Option<DocumentChange> {
        if !notification.kind.is_content_change() {
            return None;
        }

        let path = &notification.path;
        let old = self.state.get(path)?;

        let value = match self.source.load(path) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("Failed to reload {}: {}", path.display(), err);
                return None;
            }
        };

        let new = flatten(&value);
        let before = old.render();
        let after = new.render();

        let result = self.generator.generate(&before, &after);
        let label = path.display().to_string();
        let unified = DiffFormatter::format_unified(&result, &label, &label);

        self.state.replace(path.clone(), new);

        if result.is_empty() {
            tracing::debug!("{} rewritten without changes", label);
            return None;
        }

        tracing::debug!("{} changed: {}", label, DiffFormatter::format_stats(&result));
        Some(DocumentChange::new(path.clone(), unified, result.stats))
    }

    /// Consume notifications one at a time while `should_continue` holds.
    ///
    /// Blocks at most `timeout` between checks of the predicate. Returns when
    /// the predicate fails or the notification stream closes.
    pub fn run<C, F>(
        &mut self,
        notifications: &Receiver<Notification>,
        timeout: Duration,
        mut should_continue: C,
        mut on_change: F,
    ) where
        C: FnMut() -> bool,
        F: FnMut(DocumentChange),
    {
        while should_continue() {
            match notifications.recv_timeout(timeout) {
                Ok(notification) => {
                    if let Some(change) = self.handle(&notification) {
                        on_change(change);
                    }
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::error!("Notification stream closed");
                    break;
                }
            }
        }
    }
}
