//! Reading and writing workspace and project files.

use crate::error::ConfigError;
use crate::types::{InfoField, ProjectInfo, WorkspaceConfig};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Extension of workspace configuration files.
pub const WORKSPACE_EXT: &str = "ews";

/// Conventional file name of a project's info file.
pub const PROJECT_INFO_FILE: &str = ".prjinfo";

/// Locates the workspace file (`*.ews`) directly inside `workspace_root`.
///
/// When several exist, the lexicographically first is chosen so the pick is
/// stable across runs. Returns `None` if the directory has none or cannot be read.
pub fn find_workspace_file(workspace_root: &Path) -> Option<PathBuf> {
    let entries = std::fs::read_dir(workspace_root).ok()?;
    let mut candidates: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().and_then(|e| e.to_str()) == Some(WORKSPACE_EXT))
        .collect();
    candidates.sort();
    candidates.into_iter().next()
}

/// Loads a workspace file. Project infos are left empty.
pub fn load_workspace(path: &Path) -> Result<WorkspaceConfig, ConfigError> {
    let content = read(path)?;
    serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Writes a workspace file in full.
pub fn save_workspace(path: &Path, config: &WorkspaceConfig) -> Result<(), ConfigError> {
    let json = serde_json::to_string_pretty(config).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    write(path, json)
}

/// Loads a `.prjinfo` file.
pub fn load_project_info(path: &Path) -> Result<ProjectInfo, ConfigError> {
    let content = read(path)?;
    serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Writes the selected fields of `info` into the `.prjinfo` at `path`,
/// preserving every other key already in the file.
pub fn save_project_info_fields(
    path: &Path,
    info: &ProjectInfo,
    fields: &[InfoField],
) -> Result<(), ConfigError> {
    merge_write_json(path, info.patch(fields))
}

/// Merges `patch` into the JSON object stored at `path` and rewrites the file.
///
/// The existing object is read in full, each patch key replaces the stored
/// value (a `null` patch value removes the key), and the result is written
/// with a single write call. A missing file is treated as an empty object. A
/// file that exists but is not a JSON object is an error, and nothing is
/// written.
pub fn merge_write_json(path: &Path, patch: Map<String, Value>) -> Result<(), ConfigError> {
    let mut object = match read(path) {
        Ok(content) => match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                return Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    reason: "expected a JSON object".to_string(),
                })
            }
            Err(e) => {
                return Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })
            }
        },
        Err(e) if e.is_not_found() => Map::new(),
        Err(e) => return Err(e),
    };

    for (key, value) in patch {
        if value.is_null() {
            object.remove(&key);
        } else {
            object.insert(key, value);
        }
    }

    let json = serde_json::to_string_pretty(&Value::Object(object)).map_err(|e| {
        ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    })?;
    write(path, json)
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write(path: &Path, content: String) -> Result<(), ConfigError> {
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
