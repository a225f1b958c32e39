//! `hdlws init`, `import`, `list`, and `activate`.

use crate::session::Session;
use hdlws_project::{projects_tree, sources_tree, ProjectStore, TreeItem, TreeItemKind};
use std::fmt::Write;
use std::path::Path;

/// Creates a workspace file in `root`.
pub fn init(root: &Path) -> Result<i32, Box<dyn std::error::Error>> {
    let session = Session::open(root)?;
    let mut store = session.store;
    let path = store.init_workspace()?;
    eprintln!("     Created {}", path.display());
    Ok(0)
}

/// Registers `dir` as a project, named after the directory unless `name` is given.
pub fn import(
    root: &Path,
    dir: &Path,
    name: Option<&str>,
) -> Result<i32, Box<dyn std::error::Error>> {
    let dir = std::path::absolute(dir)?;
    if !dir.is_dir() {
        return Err(format!("'{}' is not a directory", dir.display()).into());
    }
    let name = match name {
        Some(n) => n.to_string(),
        None => dir
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| format!("cannot derive a project name from '{}'", dir.display()))?
            .to_string(),
    };
    // Watch events report resolved paths.
    let dir = dir.canonicalize().unwrap_or(dir);

    let mut session = Session::open(root)?;
    session.store.add_project(&name, &dir)?;

    let Some(project) = session.store.project(&name) else {
        return Err(format!("project '{name}' vanished after import").into());
    };
    eprintln!(
        "    Imported `{name}` ({} sources, {} constraints)",
        project.info.files(hdlws_common::FileRole::Source).len(),
        project.info.files(hdlws_common::FileRole::Constraint).len()
    );
    Ok(0)
}

/// Prints the project list and the active project's files.
pub fn list(root: &Path) -> Result<i32, Box<dyn std::error::Error>> {
    let session = Session::open(root)?;
    print!("{}", render_store(&session.store));
    Ok(0)
}

/// Makes `name` the active project.
pub fn activate(root: &Path, name: &str) -> Result<i32, Box<dyn std::error::Error>> {
    let mut session = Session::open(root)?;
    session.store.activate(name)?;
    eprintln!("    Activated `{name}`");
    Ok(0)
}

fn render_store(store: &ProjectStore) -> String {
    let mut out = String::from("Projects\n");
    render_items(&projects_tree(store), 1, &mut out);
    out.push_str("Files\n");
    render_items(&sources_tree(store), 1, &mut out);
    out
}

/// Renders tree items as an indented outline, marking the active project.
pub fn render_items(items: &[TreeItem], depth: usize, out: &mut String) {
    for item in items {
        let marker = match item.kind {
            TreeItemKind::Project { active: true } => "* ",
            TreeItemKind::Project { active: false } => "  ",
            _ => "",
        };
        let _ = writeln!(out, "{:indent$}{marker}{}", "", item.label, indent = depth * 2);
        render_items(&item.children, depth + 1, out);
    }
}
