//! Presentation-free tree items for project and source views.
//!
//! Views render these items however their host UI requires; nothing here
//! knows about icons, commands, or widgets.

use crate::store::ProjectStore;
use hdlws_common::FileRole;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// What a tree item represents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TreeItemKind {
    /// A configured project.
    Project {
        /// Whether this is the active project.
        active: bool,
    },
    /// A grouping node.
    Folder,
    /// A tracked file.
    File {
        /// Absolute path of the file.
        path: PathBuf,
        /// Which list the file belongs to.
        role: FileRole,
    },
    /// Shown in place of content when there is nothing to list.
    Placeholder,
}

/// One node of a view tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeItem {
    /// Display text.
    pub label: String,
    /// What the item represents.
    #[serde(flatten)]
    pub kind: TreeItemKind,
    /// Child items, in display order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeItem>,
}

impl TreeItem {
    fn leaf(label: impl Into<String>, kind: TreeItemKind) -> Self {
        Self {
            label: label.into(),
            kind,
            children: Vec::new(),
        }
    }

    fn placeholder(label: &str) -> Self {
        Self::leaf(label, TreeItemKind::Placeholder)
    }
}

/// One item per configured project, or a placeholder when there are none.
pub fn projects_tree(store: &ProjectStore) -> Vec<TreeItem> {
    let projects = store.projects();
    if projects.is_empty() {
        return vec![TreeItem::placeholder("No project found")];
    }
    projects
        .iter()
        .map(|p| TreeItem::leaf(p.name.clone(), TreeItemKind::Project { active: p.active }))
        .collect()
}

/// The active project's files, grouped into "Sources" and "Constraints".
pub fn sources_tree(store: &ProjectStore) -> Vec<TreeItem> {
    let Some(project) = store.active_project() else {
        return vec![TreeItem::placeholder("No active project")];
    };

    [(FileRole::Source, "Sources"), (FileRole::Constraint, "Constraints")]
        .into_iter()
        .map(|(role, label)| {
            let mut children: Vec<TreeItem> = project
                .info
                .files(role)
                .iter()
                .map(|path| {
                    TreeItem::leaf(
                        display_path(path, &project.project_root),
                        TreeItemKind::File {
                            path: path.clone(),
                            role,
                        },
                    )
                })
                .collect();
            if children.is_empty() {
                children.push(TreeItem::placeholder("(none)"));
            }
            TreeItem {
                label: label.to_string(),
                kind: TreeItemKind::Folder,
                children,
            }
        })
        .collect()
}

fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}
