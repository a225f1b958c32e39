//! Error types for project store operations.

use hdlws_config::ConfigError;
use std::path::PathBuf;

/// Errors reported by [`ProjectStore`](crate::ProjectStore) and the file watch bridge.
///
/// Every failure leaves the in-memory state as it was before the operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No workspace file has been loaded.
    #[error("no workspace is open")]
    NoWorkspace,

    /// The workspace has no active project.
    #[error("no active project")]
    NoActiveProject,

    /// A named project does not exist in the workspace.
    #[error("unknown project '{0}'")]
    ProjectNotFound(String),

    /// A project with the same name already exists.
    #[error("project '{0}' already exists")]
    DuplicateProject(String),

    /// A workspace file already exists where one would be created.
    #[error("workspace file {0} already exists")]
    WorkspaceExists(PathBuf),

    /// Reading or writing a workspace or project file failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The filesystem watcher could not be set up.
    #[error("file watcher error: {0}")]
    Watch(#[from] notify::Error),
}
