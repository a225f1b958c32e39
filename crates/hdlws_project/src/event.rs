//! Classified filesystem events.

use std::path::PathBuf;

/// What happened to a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileEventKind {
    /// The path came into existence.
    Create,
    /// The path was removed.
    Delete,
    /// The path's contents changed.
    Modify,
}

/// A single filesystem event forwarded to the project store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileEvent {
    /// The affected path.
    pub path: PathBuf,
    /// The kind of change.
    pub kind: FileEventKind,
}

impl FileEvent {
    /// Creates an event.
    pub fn new(path: impl Into<PathBuf>, kind: FileEventKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}
