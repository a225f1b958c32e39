//! Project bookkeeping for HDL workspaces.
//!
//! [`ProjectStore`] is the single source of truth for which projects exist,
//! which one is active, and which source and constraint files belong to each.
//! [`FileWatchBridge`] feeds it filesystem events, and the [`tree`] module
//! turns its state into presentation-free tree items for views.

#![warn(missing_docs)]

pub mod error;
pub mod event;
pub mod scan;
pub mod store;
pub mod tree;
pub mod watch;

pub use error::StoreError;
pub use event::{FileEvent, FileEventKind};
pub use scan::{collect_project_files, ProjectFiles};
pub use store::ProjectStore;
pub use tree::{projects_tree, sources_tree, TreeItem, TreeItemKind};
pub use watch::{classify_event, FileWatchBridge};
