use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use anyhow::{Context, Result};

use crate::discovery::normalize_path;
use crate::events::{Notification, NotificationKind};

/// Delivers change notifications for a set of documents.
///
/// The parent directory of every document is watched rather than the file
/// itself, since preference writers usually replace files by rename.
pub struct PreferenceWatcher {
    _watcher: RecommendedWatcher,
    notification_rx: Receiver<Notification>,
}

impl PreferenceWatcher {
    pub fn new<I, P>(documents: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let directories: BTreeSet<PathBuf> = documents
            .into_iter()
            .filter_map(|doc| {
                let doc: PathBuf = doc.into();
                doc.parent().map(|dir| dir.to_path_buf())
            })
            .collect();

        let (tx, rx) = mpsc::channel::<notify::Result<Event>>();
        let (notification_tx, notification_rx) = mpsc::channel::<Notification>();

        let mut watcher = notify::recommended_watcher(tx)
            .context("Failed to create file system watcher")?;

        for dir in &directories {
            watcher
                .watch(dir, RecursiveMode::NonRecursive)
                .with_context(|| format!("Failed to watch {}", dir.display()))?;
            tracing::debug!("Watching {}", dir.display());
        }

        // Translate notify events on a background thread
        thread::spawn(move || {
            while let Ok(result) = rx.recv() {
                match result {
                    Ok(event) => {
                        for notification in classify(&event) {
                            if notification_tx.send(notification).is_err() {
                                return; // Receiver dropped, exit thread
                            }
                        }
                    }
                    Err(err) => {
                        tracing::error!("File watcher error: {}", err);
                    }
                }
            }
        });

        Ok(Self {
            _watcher: watcher,
            notification_rx,
        })
    }

    pub fn receiver(&self) -> &Receiver<Notification> {
        &self.notification_rx
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<Notification, mpsc::RecvTimeoutError> {
        self.notification_rx.recv_timeout(timeout)
    }
}

/// Map one notify event onto per-path notifications.
pub fn classify(event: &Event) -> Vec<Notification> {
    let kind = match event.kind {
        EventKind::Create(_) => NotificationKind::Created,
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => NotificationKind::Created,
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => NotificationKind::Removed,
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            // paths are [from, to]
            let mut out = Vec::new();
            if let Some(from) = event.paths.first() {
                out.push(Notification::new(normalize_path(from), NotificationKind::Removed));
            }
            if let Some(to) = event.paths.get(1) {
                out.push(Notification::new(normalize_path(to), NotificationKind::Created));
            }
            return out;
        }
        EventKind::Modify(ModifyKind::Metadata(_)) => NotificationKind::Other,
        EventKind::Modify(_) => NotificationKind::Modified,
        EventKind::Remove(_) => NotificationKind::Removed,
        _ => NotificationKind::Other,
    };

    event
        .paths
        .iter()
        .map(|path| Notification::new(normalize_path(path), kind))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, MetadataKind, RemoveKind};

    fn event(kind: EventKind, paths: &[&str]) -> Event {
        paths
            .iter()
            .fold(Event::new(kind), |ev, p| ev.add_path(PathBuf::from(p)))
    }

    #[test]
    fn test_classify_content_changes() {
        let created = classify(&event(EventKind::Create(CreateKind::File), &["/tmp/a.plist"]));
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].kind, NotificationKind::Created);

        let modified = classify(&event(
            EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            &["/tmp/a.plist"],
        ));
        assert_eq!(modified[0].kind, NotificationKind::Modified);

        let renamed_in = classify(&event(
            EventKind::Modify(ModifyKind::Name(RenameMode::To)),
            &["/tmp/a.plist"],
        ));
        assert_eq!(renamed_in[0].kind, NotificationKind::Created);
    }

    #[test]
    fn test_classify_rename_both() {
        let notifications = classify(&event(
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            &["/tmp/a.plist.tmp", "/tmp/a.plist"],
        ));

        assert_eq!(notifications.len(), 2);
        assert_eq!(notifications[0].kind, NotificationKind::Removed);
        assert_eq!(notifications[1].kind, NotificationKind::Created);
        assert_eq!(notifications[1].path.file_name().unwrap(), "a.plist");
    }

    #[test]
    fn test_classify_ignored_kinds() {
        let metadata = classify(&event(
            EventKind::Modify(ModifyKind::Metadata(MetadataKind::Permissions)),
            &["/tmp/a.plist"],
        ));
        assert_eq!(metadata[0].kind, NotificationKind::Other);

        let removed = classify(&event(EventKind::Remove(RemoveKind::File), &["/tmp/a.plist"]));
        assert_eq!(removed[0].kind, NotificationKind::Removed);
        assert!(!removed[0].kind.is_content_change());
    }
}
