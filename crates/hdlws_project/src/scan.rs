//! Discovery of project files on disk.

use hdlws_common::{is_excluded, FileRole};
use std::fs;
use std::path::{Path, PathBuf};

/// Source and constraint files found under a project root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFiles {
    /// HDL source files, sorted.
    pub sources: Vec<PathBuf>,
    /// Constraint files, sorted.
    pub constraints: Vec<PathBuf>,
}

/// Recursively collects recognized files under `root`, skipping the
/// `excluded` directory prefixes and hidden directories.
pub fn collect_project_files(root: &Path, excluded: &[String]) -> ProjectFiles {
    let mut files = ProjectFiles::default();
    if root.is_dir() {
        collect(root, root, excluded, &mut files);
    }
    files.sources.sort();
    files.constraints.sort();
    files
}

fn collect(root: &Path, dir: &Path, excluded: &[String], out: &mut ProjectFiles) {
    let entries = match fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "skipping unreadable directory");
            return;
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if is_excluded(&path, root, excluded) {
            continue;
        }
        if path.is_dir() {
            let hidden = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with('.'));
            if !hidden {
                collect(root, &path, excluded, out);
            }
            continue;
        }
        match FileRole::classify(&path) {
            Some(FileRole::Source) => out.sources.push(path),
            Some(FileRole::Constraint) => out.constraints.push(path),
            None => {}
        }
    }
}
