//! Bridge from `notify` filesystem callbacks to [`ProjectStore`] events.

use crate::error::StoreError;
use crate::event::{FileEvent, FileEventKind};
use crate::store::ProjectStore;
use notify::event::{CreateKind, ModifyKind, RenameMode};
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

const WATCHER_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Holds one recursive watcher per project root and drains their events.
///
/// Watchers deliver raw `notify` events over a channel; [`drain`](Self::drain)
/// classifies whatever has arrived without blocking, so the bridge can be
/// polled from a single-threaded event loop.
pub struct FileWatchBridge {
    watchers: Vec<(PathBuf, RecommendedWatcher)>,
    tx: mpsc::Sender<notify::Result<notify::Event>>,
    rx: mpsc::Receiver<notify::Result<notify::Event>>,
}

impl FileWatchBridge {
    /// Creates a bridge with no watchers.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            watchers: Vec::new(),
            tx,
            rx,
        }
    }

    /// Replaces all watchers with one per root of `store`.
    ///
    /// Existing watchers are dropped first. Roots that no longer exist on disk
    /// are skipped with a warning. Without a workspace no watcher is created.
    /// Returns the number of active watchers.
    pub fn rewatch(&mut self, store: &ProjectStore) -> Result<usize, StoreError> {
        self.watchers.clear();
        for root in store.watch_roots() {
            if !root.is_dir() {
                tracing::warn!(root = %root.display(), "project root missing; not watching");
                continue;
            }
            let tx = self.tx.clone();
            let mut watcher = RecommendedWatcher::new(
                move |res: notify::Result<notify::Event>| {
                    let _ = tx.send(res);
                },
                Config::default().with_poll_interval(WATCHER_POLL_INTERVAL),
            )?;
            watcher.watch(&root, RecursiveMode::Recursive)?;
            tracing::debug!(root = %root.display(), "watching");
            self.watchers.push((root, watcher));
        }
        Ok(self.watchers.len())
    }

    /// Roots currently being watched.
    pub fn watched_roots(&self) -> impl Iterator<Item = &Path> {
        self.watchers.iter().map(|(root, _)| root.as_path())
    }

    /// Classifies every event received since the last drain.
    pub fn drain(&mut self) -> Vec<FileEvent> {
        let mut events = Vec::new();
        while let Ok(res) = self.rx.try_recv() {
            match res {
                Ok(event) => events.extend(classify_event(event)),
                Err(e) => tracing::warn!(error = %e, "file watcher error"),
            }
        }
        events
    }

    /// Drains pending events into `store`, returning them for further routing.
    ///
    /// Each event is applied independently; a failure to persist one is
    /// logged and does not stop the rest.
    pub fn forward(&mut self, store: &mut ProjectStore) -> Vec<FileEvent> {
        let events = self.drain();
        for event in &events {
            if let Err(e) = store.record_file_event(event) {
                tracing::warn!(path = %event.path.display(), error = %e, "could not record file event");
            }
        }
        events
    }
}

impl Default for FileWatchBridge {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps a raw `notify` event to zero or more [`FileEvent`]s.
///
/// Directory creation is dropped (directories are not tracked). Renames
/// become a delete of the old path and a create of the new one.
pub fn classify_event(event: notify::Event) -> Vec<FileEvent> {
    match event.kind {
        EventKind::Create(kind) => event
            .paths
            .into_iter()
            .filter(|path| !is_dir(path, Some(kind)))
            .map(|path| FileEvent::new(path, FileEventKind::Create))
            .collect(),
        EventKind::Remove(_) => event
            .paths
            .into_iter()
            .map(|path| FileEvent::new(path, FileEventKind::Delete))
            .collect(),
        EventKind::Modify(ModifyKind::Name(mode)) => classify_rename(mode, event.paths),
        EventKind::Modify(_) => event
            .paths
            .into_iter()
            .map(|path| FileEvent::new(path, FileEventKind::Modify))
            .collect(),
        _ => Vec::new(),
    }
}

fn classify_rename(mode: RenameMode, paths: Vec<PathBuf>) -> Vec<FileEvent> {
    match mode {
        RenameMode::Both if paths.len() >= 2 => {
            let mut paths = paths.into_iter();
            let mut events = Vec::new();
            if let Some(from) = paths.next() {
                events.push(FileEvent::new(from, FileEventKind::Delete));
            }
            if let Some(to) = paths.next() {
                if !is_dir(&to, None) {
                    events.push(FileEvent::new(to, FileEventKind::Create));
                }
            }
            events
        }
        RenameMode::From => paths
            .into_iter()
            .map(|path| FileEvent::new(path, FileEventKind::Delete))
            .collect(),
        RenameMode::To => paths
            .into_iter()
            .filter(|path| !is_dir(path, None))
            .map(|path| FileEvent::new(path, FileEventKind::Create))
            .collect(),
        _ => paths
            .into_iter()
            .map(|path| {
                let kind = if path.exists() {
                    FileEventKind::Create
                } else {
                    FileEventKind::Delete
                };
                FileEvent::new(path, kind)
            })
            .collect(),
    }
}

fn is_dir(path: &Path, create_kind: Option<CreateKind>) -> bool {
    match create_kind {
        Some(CreateKind::Folder) => true,
        Some(CreateKind::File) => false,
        _ => std::fs::metadata(path)
            .map(|meta| meta.is_dir())
            .unwrap_or(false),
    }
}
