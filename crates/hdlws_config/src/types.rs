//! Workspace and project types persisted as JSON.

use hdlws_common::FileRole;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The contents of a workspace's `.ews` file.
///
/// Lists every project configured in the workspace. Only the project
/// references are persisted here; each project's file lists live in its own
/// `.prjinfo` file and are loaded into [`ProjectConfig::info`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceConfig {
    /// Root directory of the workspace.
    pub workspace_root: PathBuf,
    /// Configured projects, in the order they were added.
    #[serde(default)]
    pub projects: Vec<ProjectConfig>,
}

impl WorkspaceConfig {
    /// Creates an empty workspace rooted at `workspace_root`.
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            projects: Vec::new(),
        }
    }

    /// Returns the currently active project, if any.
    pub fn active(&self) -> Option<&ProjectConfig> {
        self.projects.iter().find(|p| p.active)
    }

    /// Looks up a project by name.
    pub fn project(&self, name: &str) -> Option<&ProjectConfig> {
        self.projects.iter().find(|p| p.name == name)
    }
}

/// One project entry of a workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Project name, unique within the workspace.
    pub name: String,
    /// Path to the project's `.prjinfo` file.
    pub project_info_path: PathBuf,
    /// Root directory of the project's files.
    pub project_root: PathBuf,
    /// Whether this is the workspace's active project.
    #[serde(default)]
    pub active: bool,
    /// Contents of the `.prjinfo` file, loaded separately.
    #[serde(skip)]
    pub info: ProjectInfo,
}

impl ProjectConfig {
    /// Creates an inactive project entry with the conventional `.prjinfo` location.
    pub fn new(name: impl Into<String>, project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        Self {
            name: name.into(),
            project_info_path: project_root.join(crate::PROJECT_INFO_FILE),
            project_root,
            active: false,
            info: ProjectInfo::default(),
        }
    }

    /// Returns `true` if `path` lies under this project's root.
    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.project_root)
    }
}

/// The contents of a `.prjinfo` file.
///
/// Every field is optional, because the file is written piecemeal by several
/// tools. Keys not modeled here are preserved by merge-writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    /// Root directory recorded by the tool that created the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_root: Option<PathBuf>,
    /// Tracked HDL source files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_files: Option<Vec<PathBuf>>,
    /// Tracked constraint files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Vec<PathBuf>>,
    /// User-selected top module, authoritative over parser order when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_module: Option<String>,
}

/// A single `.prjinfo` key, used to select what a merge-write updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoField {
    /// The `projectRoot` key.
    ProjectRoot,
    /// The `sourceFiles` key.
    SourceFiles,
    /// The `constraints` key.
    Constraints,
    /// The `topModule` key.
    TopModule,
}

impl InfoField {
    /// All fields, in file order.
    pub const ALL: [InfoField; 4] = [
        InfoField::ProjectRoot,
        InfoField::SourceFiles,
        InfoField::Constraints,
        InfoField::TopModule,
    ];

    /// The JSON key for this field.
    pub fn key(self) -> &'static str {
        match self {
            InfoField::ProjectRoot => "projectRoot",
            InfoField::SourceFiles => "sourceFiles",
            InfoField::Constraints => "constraints",
            InfoField::TopModule => "topModule",
        }
    }
}

impl From<FileRole> for InfoField {
    fn from(role: FileRole) -> Self {
        match role {
            FileRole::Source => InfoField::SourceFiles,
            FileRole::Constraint => InfoField::Constraints,
        }
    }
}

impl ProjectInfo {
    /// Returns the tracked files of the given role (empty if unset).
    pub fn files(&self, role: FileRole) -> &[PathBuf] {
        let list = match role {
            FileRole::Source => &self.source_files,
            FileRole::Constraint => &self.constraints,
        };
        list.as_deref().unwrap_or(&[])
    }

    fn files_mut(&mut self, role: FileRole) -> &mut Vec<PathBuf> {
        let list = match role {
            FileRole::Source => &mut self.source_files,
            FileRole::Constraint => &mut self.constraints,
        };
        list.get_or_insert_with(Vec::new)
    }

    /// Adds `path` to the list for `role`. Returns `false` if it was already present.
    pub fn insert_file(&mut self, role: FileRole, path: &Path) -> bool {
        let files = self.files_mut(role);
        if files.iter().any(|p| p == path) {
            return false;
        }
        files.push(path.to_path_buf());
        true
    }

    /// Removes `path` from the list for `role`. Returns `false` if it was absent.
    pub fn remove_file(&mut self, role: FileRole, path: &Path) -> bool {
        let Some(files) = (match role {
            FileRole::Source => self.source_files.as_mut(),
            FileRole::Constraint => self.constraints.as_mut(),
        }) else {
            return false;
        };
        let before = files.len();
        files.retain(|p| p != path);
        files.len() != before
    }

    /// Replaces the list for `role`.
    pub fn set_files(&mut self, role: FileRole, files: Vec<PathBuf>) {
        *self.files_mut(role) = files;
    }

    /// Keeps only the files of `role` for which `keep` returns `true`.
    pub fn retain_files(&mut self, role: FileRole, mut keep: impl FnMut(&Path) -> bool) {
        let list = match role {
            FileRole::Source => self.source_files.as_mut(),
            FileRole::Constraint => self.constraints.as_mut(),
        };
        if let Some(files) = list {
            files.retain(|p| keep(p));
        }
    }

    /// Serializes the selected fields into a JSON patch.
    ///
    /// Unset fields map to `null`, which [`merge_write_json`](crate::merge_write_json)
    /// treats as key removal.
    pub fn patch(&self, fields: &[InfoField]) -> serde_json::Map<String, serde_json::Value> {
        let mut patch = serde_json::Map::new();
        for &field in fields {
            let value = match field {
                InfoField::ProjectRoot => to_value(&self.project_root),
                InfoField::SourceFiles => to_value(&self.source_files),
                InfoField::Constraints => to_value(&self.constraints),
                InfoField::TopModule => to_value(&self.top_module),
            };
            patch.insert(field.key().to_string(), value);
        }
        patch
    }
}

fn to_value<T: Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
}
