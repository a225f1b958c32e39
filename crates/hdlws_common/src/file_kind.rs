//! Classification of project files by extension.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Extensions (without the dot) recognized as HDL source files.
pub const SOURCE_EXTENSIONS: &[&str] = &["v", "vhd", "vhdl", "sv"];

/// Extensions (without the dot) recognized as constraint files.
pub const CONSTRAINT_EXTENSIONS: &[&str] = &["pcf", "sdc"];

/// The list a tracked project file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileRole {
    /// An HDL source file, tracked in `sourceFiles`.
    Source,
    /// A constraint file, tracked in `constraints`.
    Constraint,
}

impl FileRole {
    /// Classifies a path by its extension, returning `None` for unrecognized files.
    ///
    /// Matching is case-sensitive, as HDL toolchains treat `.V` and `.v` differently.
    pub fn classify(path: &Path) -> Option<Self> {
        let ext = path.extension().and_then(|e| e.to_str())?;
        if SOURCE_EXTENSIONS.contains(&ext) {
            Some(FileRole::Source)
        } else if CONSTRAINT_EXTENSIONS.contains(&ext) {
            Some(FileRole::Constraint)
        } else {
            None
        }
    }

    /// Returns the `.prjinfo` key holding files of this role.
    pub fn info_key(self) -> &'static str {
        match self {
            FileRole::Source => "sourceFiles",
            FileRole::Constraint => "constraints",
        }
    }
}

/// Returns `true` if the path has an HDL source extension.
pub fn is_hdl_source(path: &Path) -> bool {
    FileRole::classify(path) == Some(FileRole::Source)
}

/// Returns `true` if `path` lies under one of the `excluded` directory
/// prefixes, interpreted relative to `root`.
///
/// Paths outside `root` are never excluded.
pub fn is_excluded(path: &Path, root: &Path, excluded: &[String]) -> bool {
    let Ok(relative) = path.strip_prefix(root) else {
        return false;
    };
    excluded
        .iter()
        .filter(|prefix| !prefix.is_empty())
        .any(|prefix| relative.starts_with(Path::new(prefix)))
}

/// Converts a path to the string form stored in JSON files.
pub fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
