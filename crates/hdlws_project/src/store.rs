//! The project store: workspace state, active-project selection, and
//! file-list synchronization.

use crate::error::StoreError;
use crate::event::{FileEvent, FileEventKind};
use crate::scan::collect_project_files;
use hdlws_common::{is_excluded, FileRole, Notification, NotificationBus};
use hdlws_config::{
    find_workspace_file, load_project_info, load_workspace, save_project_info_fields,
    save_workspace, InfoField, ProjectConfig, ProjectInfo, WorkspaceConfig, WORKSPACE_EXT,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Owns the loaded workspace and keeps its files on disk in sync.
///
/// Every mutation is persisted before it is committed to memory: a failed
/// write leaves the in-memory state untouched. Mutations announce themselves
/// on the [`NotificationBus`] the store was constructed with.
pub struct ProjectStore {
    workspace_root: PathBuf,
    workspace_file: Option<PathBuf>,
    workspace: Option<WorkspaceConfig>,
    excluded: Vec<String>,
    bus: NotificationBus,
}

impl ProjectStore {
    /// Creates an empty store for the workspace at `workspace_root`.
    ///
    /// Nothing is read until [`load_all`](Self::load_all) is called.
    pub fn new(workspace_root: impl Into<PathBuf>, excluded: Vec<String>, bus: NotificationBus) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            workspace_file: None,
            workspace: None,
            excluded,
            bus,
        }
    }

    /// Root directory of the workspace.
    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Path of the loaded workspace file, if any.
    pub fn workspace_file(&self) -> Option<&Path> {
        self.workspace_file.as_deref()
    }

    /// The loaded workspace configuration, if any.
    pub fn workspace(&self) -> Option<&WorkspaceConfig> {
        self.workspace.as_ref()
    }

    /// Directory prefixes whose file events are ignored.
    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }

    /// The bus this store publishes on.
    pub fn bus(&self) -> &NotificationBus {
        &self.bus
    }

    /// All configured projects (empty without a workspace).
    pub fn projects(&self) -> &[ProjectConfig] {
        self.workspace
            .as_ref()
            .map(|ws| ws.projects.as_slice())
            .unwrap_or(&[])
    }

    /// Looks up a project by name.
    pub fn project(&self, name: &str) -> Option<&ProjectConfig> {
        self.projects().iter().find(|p| p.name == name)
    }

    /// The active project, if any.
    pub fn active_project(&self) -> Option<&ProjectConfig> {
        self.projects().iter().find(|p| p.active)
    }

    /// The project whose root contains `path`. Nested roots resolve to the
    /// innermost project.
    pub fn owning_project(&self, path: &Path) -> Option<&ProjectConfig> {
        self.owning_index(path).map(|i| &self.projects()[i])
    }

    fn owning_index(&self, path: &Path) -> Option<usize> {
        self.projects()
            .iter()
            .enumerate()
            .filter(|(_, p)| p.contains(path))
            .max_by_key(|(_, p)| p.project_root.components().count())
            .map(|(i, _)| i)
    }

    /// Roots that should be watched for file events, one per project.
    pub fn watch_roots(&self) -> Vec<PathBuf> {
        let mut roots: Vec<PathBuf> = self
            .projects()
            .iter()
            .map(|p| p.project_root.clone())
            .collect();
        roots.sort();
        roots.dedup();
        roots
    }

    /// Reads the workspace file and every project's `.prjinfo`.
    ///
    /// A missing workspace file leaves the store empty and is not an error. A
    /// corrupt workspace file is reported and the previously loaded state is
    /// kept. A missing or corrupt `.prjinfo` only logs a warning; that
    /// project keeps the info it had before the reload, or an empty one.
    pub fn load_all(&mut self) -> Result<(), StoreError> {
        let Some(path) = find_workspace_file(&self.workspace_root) else {
            tracing::info!(root = %self.workspace_root.display(), "no workspace file found");
            self.workspace_file = None;
            self.workspace = None;
            return Ok(());
        };

        let mut workspace = load_workspace(&path)?;

        let mut previous: HashMap<String, ProjectInfo> = self
            .workspace
            .take()
            .map(|ws| ws.projects.into_iter().map(|p| (p.name, p.info)).collect())
            .unwrap_or_default();

        for project in &mut workspace.projects {
            match load_project_info(&project.project_info_path) {
                Ok(info) => project.info = info,
                Err(e) => {
                    tracing::warn!(project = %project.name, error = %e, "could not load project info");
                    project.info = previous.remove(&project.name).unwrap_or_default();
                }
            }
        }

        let active = workspace.projects.iter().filter(|p| p.active).count();
        if active > 1 {
            tracing::warn!(count = active, "workspace lists several active projects");
        }

        tracing::info!(
            file = %path.display(),
            projects = workspace.projects.len(),
            "workspace loaded"
        );
        self.workspace_file = Some(path);
        self.workspace = Some(workspace);
        Ok(())
    }

    /// Re-reads the workspace after another process changed it.
    ///
    /// Publishes an active-project change when the active project is now a
    /// different one. Returns `true` if the set of watch roots changed.
    pub fn reload_workspace(&mut self) -> Result<bool, StoreError> {
        let active_before = self.active_project().map(|p| p.name.clone());
        let roots_before = self.watch_roots();
        self.load_all()?;

        let active_after = self.active_project().map(|p| p.name.clone());
        if active_after != active_before {
            if let Some(name) = active_after {
                tracing::info!(project = %name, "active project changed on disk");
                self.bus
                    .publish(Notification::ActiveProjectChanged { name });
            }
        }
        Ok(self.watch_roots() != roots_before)
    }

    /// Creates a new, empty workspace file named after the workspace directory.
    ///
    /// Fails if a workspace file already exists.
    pub fn init_workspace(&mut self) -> Result<PathBuf, StoreError> {
        if let Some(existing) = find_workspace_file(&self.workspace_root) {
            return Err(StoreError::WorkspaceExists(existing));
        }
        let stem = self
            .workspace_root
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("workspace");
        let path = self.workspace_root.join(format!("{stem}.{WORKSPACE_EXT}"));
        let workspace = WorkspaceConfig::new(self.workspace_root.clone());
        save_workspace(&path, &workspace)?;

        tracing::info!(file = %path.display(), "workspace created");
        self.workspace_file = Some(path.clone());
        self.workspace = Some(workspace);
        Ok(path)
    }

    /// Registers the project rooted at `root` under `name`.
    ///
    /// The root is scanned for recognized files, which are merged into its
    /// `.prjinfo`. Listed files that no longer exist, or that lie outside the
    /// root, are dropped; keys the scan does not produce, such as
    /// `topModule`, are preserved. The first project of a workspace becomes active.
    pub fn add_project(&mut self, name: &str, root: &Path) -> Result<(), StoreError> {
        let (workspace, workspace_file) = self.open_workspace()?;
        if workspace.project(name).is_some() {
            return Err(StoreError::DuplicateProject(name.to_string()));
        }

        let mut project = ProjectConfig::new(name, root);
        project.active = workspace.active().is_none();

        let mut info = match load_project_info(&project.project_info_path) {
            Ok(info) => info,
            Err(e) if e.is_not_found() => ProjectInfo::default(),
            Err(e) => return Err(e.into()),
        };
        info.project_root = Some(root.to_path_buf());
        let files = collect_project_files(root, &self.excluded);
        for (role, found) in [
            (FileRole::Source, &files.sources),
            (FileRole::Constraint, &files.constraints),
        ] {
            info.retain_files(role, |path| {
                path.starts_with(root)
                    && !is_excluded(path, root, &self.excluded)
                    && path.is_file()
                    && FileRole::classify(path) == Some(role)
            });
            for path in found {
                info.insert_file(role, path);
            }
        }
        save_project_info_fields(
            &project.project_info_path,
            &info,
            &[
                InfoField::ProjectRoot,
                InfoField::SourceFiles,
                InfoField::Constraints,
            ],
        )?;
        project.info = info;

        let mut updated = workspace.clone();
        let active = project.active;
        updated.projects.push(project);
        save_workspace(&workspace_file, &updated)?;
        self.workspace = Some(updated);

        tracing::info!(project = name, root = %root.display(), "project added");
        self.bus.publish(Notification::TreeChanged {
            project: name.to_string(),
        });
        if active {
            self.bus.publish(Notification::ActiveProjectChanged {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Makes `name` the only active project and persists the workspace.
    pub fn activate(&mut self, name: &str) -> Result<(), StoreError> {
        let (workspace, workspace_file) = match self.open_workspace() {
            Ok(open) => open,
            Err(e) => {
                tracing::warn!(project = name, "cannot activate a project without a workspace");
                return Err(e);
            }
        };
        if workspace.project(name).is_none() {
            return Err(StoreError::ProjectNotFound(name.to_string()));
        }

        let mut updated = workspace.clone();
        for project in &mut updated.projects {
            project.active = project.name == name;
        }
        save_workspace(&workspace_file, &updated)?;
        self.workspace = Some(updated);

        tracing::info!(project = name, "active project changed");
        self.bus.publish(Notification::ActiveProjectChanged {
            name: name.to_string(),
        });
        self.bus.publish(Notification::TreeChanged {
            project: name.to_string(),
        });
        Ok(())
    }

    /// Applies one filesystem event to the owning project's file lists.
    ///
    /// Returns `Ok(true)` if a list changed and was persisted. Modifications,
    /// paths under excluded directories, paths outside every project, and
    /// unrecognized files are ignored. Deleting a path without a recognized
    /// extension drops every tracked file beneath it, which covers directory
    /// removal.
    pub fn record_file_event(&mut self, event: &FileEvent) -> Result<bool, StoreError> {
        let path = event.path.as_path();
        if event.kind == FileEventKind::Modify {
            return Ok(false);
        }
        let Some(index) = self.owning_index(path) else {
            tracing::debug!(path = %path.display(), "event outside every project");
            return Ok(false);
        };
        let Some(workspace) = self.workspace.as_ref() else {
            return Ok(false);
        };
        let project = &workspace.projects[index];
        if is_excluded(path, &project.project_root, &self.excluded) {
            return Ok(false);
        }

        let roles: &[FileRole] = match (event.kind, FileRole::classify(path)) {
            (_, Some(FileRole::Source)) => &[FileRole::Source],
            (_, Some(FileRole::Constraint)) => &[FileRole::Constraint],
            (FileEventKind::Delete, None) => &[FileRole::Source, FileRole::Constraint],
            _ => return Ok(false),
        };

        // Other tools write these lists too; start from what is on disk.
        let on_disk = match load_project_info(&project.project_info_path) {
            Ok(info) => info,
            Err(e) if e.is_not_found() => ProjectInfo::default(),
            Err(e) => return Err(e.into()),
        };
        let mut info = project.info.clone();
        for &role in roles {
            info.set_files(role, on_disk.files(role).to_vec());
        }

        let mut changed_fields = Vec::new();
        match (event.kind, FileRole::classify(path)) {
            (FileEventKind::Create, Some(role)) => {
                if info.insert_file(role, path) {
                    changed_fields.push(InfoField::from(role));
                }
            }
            (FileEventKind::Delete, Some(role)) => {
                if info.remove_file(role, path) {
                    changed_fields.push(InfoField::from(role));
                }
            }
            (FileEventKind::Delete, None) => {
                for role in [FileRole::Source, FileRole::Constraint] {
                    let beneath: Vec<PathBuf> = info
                        .files(role)
                        .iter()
                        .filter(|f| f.starts_with(path))
                        .cloned()
                        .collect();
                    for file in &beneath {
                        info.remove_file(role, file);
                    }
                    if !beneath.is_empty() {
                        changed_fields.push(InfoField::from(role));
                    }
                }
            }
            _ => {}
        }
        let name = project.name.clone();
        let info_path = project.project_info_path.clone();
        if changed_fields.is_empty() {
            if let Some(workspace) = self.workspace.as_mut() {
                workspace.projects[index].info = info;
            }
            return Ok(false);
        }

        save_project_info_fields(&info_path, &info, &changed_fields)?;
        if let Some(workspace) = self.workspace.as_mut() {
            workspace.projects[index].info = info;
        }

        tracing::debug!(project = %name, path = %path.display(), kind = ?event.kind, "file lists updated");
        self.bus.publish(Notification::TreeChanged { project: name });
        Ok(true)
    }

    /// Persists `top` as the active project's `topModule`; `None` clears it.
    pub fn set_top_module(&mut self, top: Option<&str>) -> Result<(), StoreError> {
        let index = self
            .projects()
            .iter()
            .position(|p| p.active)
            .ok_or(StoreError::NoActiveProject)?;
        let Some(workspace) = self.workspace.as_mut() else {
            return Err(StoreError::NoWorkspace);
        };
        let project = &mut workspace.projects[index];

        let mut info = project.info.clone();
        info.top_module = top.map(str::to_string);
        save_project_info_fields(&project.project_info_path, &info, &[InfoField::TopModule])?;
        project.info = info;
        tracing::info!(project = %project.name, top = ?top, "top module saved");
        Ok(())
    }

    fn open_workspace(&self) -> Result<(&WorkspaceConfig, PathBuf), StoreError> {
        match (&self.workspace, &self.workspace_file) {
            (Some(ws), Some(file)) => Ok((ws, file.clone())),
            _ => Err(StoreError::NoWorkspace),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdlws_config::PROJECT_INFO_FILE;
    use std::fs;

    struct Fixture {
        _dir: tempfile::TempDir,
        root: PathBuf,
        store: ProjectStore,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        let store = ProjectStore::new(&root, vec!["build".to_string()], NotificationBus::new());
        Fixture {
            _dir: dir,
            root,
            store,
        }
    }

    fn with_projects(names: &[&str]) -> Fixture {
        let mut fx = fixture();
        fx.store.init_workspace().unwrap();
        for name in names {
            let root = fx.root.join(name);
            fs::create_dir_all(root.join("src")).unwrap();
            fx.store.add_project(name, &root).unwrap();
        }
        fx
    }

    #[test]
    fn load_without_workspace_is_empty() {
        let mut fx = fixture();
        fx.store.load_all().unwrap();
        assert!(fx.store.workspace().is_none());
        assert!(fx.store.projects().is_empty());
        assert!(fx.store.watch_roots().is_empty());
    }

    #[test]
    fn activate_without_workspace_fails() {
        let mut fx = fixture();
        let err = fx.store.activate("a").unwrap_err();
        assert!(matches!(err, StoreError::NoWorkspace));
    }

    #[test]
    fn first_project_becomes_active() {
        let fx = with_projects(&["a", "b"]);
        assert_eq!(fx.store.active_project().unwrap().name, "a");
        assert!(!fx.store.project("b").unwrap().active);
    }

    #[test]
    fn activate_switches_exactly_one() {
        let mut fx = with_projects(&["a", "b"]);
        let rx = fx.store.bus().subscribe();
        fx.store.activate("b").unwrap();

        let active: Vec<_> = fx.store.projects().iter().filter(|p| p.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "b");

        let persisted = load_workspace(fx.store.workspace_file().unwrap()).unwrap();
        assert!(!persisted.project("a").unwrap().active);
        assert!(persisted.project("b").unwrap().active);

        assert_eq!(
            rx.try_recv().unwrap(),
            Notification::ActiveProjectChanged { name: "b".into() }
        );
    }

    #[test]
    fn activate_unknown_project_fails() {
        let mut fx = with_projects(&["a"]);
        let err = fx.store.activate("zzz").unwrap_err();
        assert!(matches!(err, StoreError::ProjectNotFound(_)));
        assert_eq!(fx.store.active_project().unwrap().name, "a");
    }

    #[test]
    fn duplicate_project_rejected() {
        let mut fx = with_projects(&["a"]);
        let root = fx.root.join("a");
        let err = fx.store.add_project("a", &root).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateProject(_)));
    }

    #[test]
    fn init_twice_fails() {
        let mut fx = with_projects(&[]);
        let err = fx.store.init_workspace().unwrap_err();
        assert!(matches!(err, StoreError::WorkspaceExists(_)));
    }

    #[test]
    fn create_and_delete_track_sources() {
        let mut fx = with_projects(&["a"]);
        let file = fx.root.join("a/src/top.v");

        let create = FileEvent::new(&file, FileEventKind::Create);
        assert!(fx.store.record_file_event(&create).unwrap());
        assert!(!fx.store.record_file_event(&create).unwrap());
        let info = &fx.store.project("a").unwrap().info;
        assert_eq!(info.files(FileRole::Source), &[file.clone()]);

        let on_disk = load_project_info(&fx.root.join("a").join(PROJECT_INFO_FILE)).unwrap();
        assert_eq!(on_disk.files(FileRole::Source), &[file.clone()]);

        let delete = FileEvent::new(&file, FileEventKind::Delete);
        assert!(fx.store.record_file_event(&delete).unwrap());
        assert!(!fx.store.record_file_event(&delete).unwrap());
        assert!(fx
            .store
            .project("a")
            .unwrap()
            .info
            .files(FileRole::Source)
            .is_empty());
    }

    #[test]
    fn modify_is_noop() {
        let mut fx = with_projects(&["a"]);
        let event = FileEvent::new(fx.root.join("a/src/top.v"), FileEventKind::Modify);
        assert!(!fx.store.record_file_event(&event).unwrap());
    }

    #[test]
    fn excluded_and_foreign_paths_ignored() {
        let mut fx = with_projects(&["a"]);
        let build = FileEvent::new(fx.root.join("a/build/gen.v"), FileEventKind::Create);
        assert!(!fx.store.record_file_event(&build).unwrap());
        let foreign = FileEvent::new("/elsewhere/top.v", FileEventKind::Create);
        assert!(!fx.store.record_file_event(&foreign).unwrap());
        let unknown = FileEvent::new(fx.root.join("a/notes.txt"), FileEventKind::Create);
        assert!(!fx.store.record_file_event(&unknown).unwrap());
    }

    #[test]
    fn constraint_events_leave_sources_alone() {
        let mut fx = with_projects(&["a"]);
        let src = fx.root.join("a/src/top.v");
        let pcf = fx.root.join("a/pins.pcf");
        fx.store
            .record_file_event(&FileEvent::new(&src, FileEventKind::Create))
            .unwrap();
        fx.store
            .record_file_event(&FileEvent::new(&pcf, FileEventKind::Create))
            .unwrap();
        let info = &fx.store.project("a").unwrap().info;
        assert_eq!(info.files(FileRole::Source), &[src]);
        assert_eq!(info.files(FileRole::Constraint), &[pcf]);
    }

    #[test]
    fn directory_delete_drops_contained_files() {
        let mut fx = with_projects(&["a"]);
        let keep = fx.root.join("a/top.v");
        let gone = fx.root.join("a/src/uart.v");
        for f in [&keep, &gone] {
            fx.store
                .record_file_event(&FileEvent::new(f, FileEventKind::Create))
                .unwrap();
        }
        let event = FileEvent::new(fx.root.join("a/src"), FileEventKind::Delete);
        assert!(fx.store.record_file_event(&event).unwrap());
        assert_eq!(
            fx.store.project("a").unwrap().info.files(FileRole::Source),
            &[keep]
        );
    }

    #[test]
    fn events_route_to_owning_project() {
        let mut fx = with_projects(&["a", "b"]);
        let file = fx.root.join("b/src/core.sv");
        fx.store
            .record_file_event(&FileEvent::new(&file, FileEventKind::Create))
            .unwrap();
        assert!(fx.store.project("a").unwrap().info.files(FileRole::Source).is_empty());
        assert_eq!(
            fx.store.project("b").unwrap().info.files(FileRole::Source),
            &[file]
        );
    }

    #[test]
    fn file_event_publishes_tree_change() {
        let mut fx = with_projects(&["a"]);
        let rx = fx.store.bus().subscribe();
        fx.store
            .record_file_event(&FileEvent::new(
                fx.root.join("a/src/top.v"),
                FileEventKind::Create,
            ))
            .unwrap();
        assert_eq!(
            rx.try_recv().unwrap(),
            Notification::TreeChanged { project: "a".into() }
        );
    }

    #[test]
    fn import_scans_existing_files() {
        let mut fx = fixture();
        fx.store.init_workspace().unwrap();
        let root = fx.root.join("blinky");
        fs::create_dir_all(root.join("src")).unwrap();
        fs::create_dir_all(root.join("build")).unwrap();
        fs::write(root.join("src/top.v"), "module top; endmodule").unwrap();
        fs::write(root.join("build/gen.v"), "").unwrap();
        fs::write(root.join("pins.pcf"), "").unwrap();
        fs::write(root.join(PROJECT_INFO_FILE), r#"{"topModule":"top"}"#).unwrap();

        fx.store.add_project("blinky", &root).unwrap();
        let info = &fx.store.project("blinky").unwrap().info;
        assert_eq!(info.files(FileRole::Source), &[root.join("src/top.v")]);
        assert_eq!(info.files(FileRole::Constraint), &[root.join("pins.pcf")]);
        assert_eq!(info.top_module.as_deref(), Some("top"));
        assert_eq!(info.project_root.as_deref(), Some(root.as_path()));
    }

    #[test]
    fn reload_keeps_stale_info_for_corrupt_file() {
        let mut fx = with_projects(&["a"]);
        let file = fx.root.join("a/src/top.v");
        fx.store
            .record_file_event(&FileEvent::new(&file, FileEventKind::Create))
            .unwrap();
        fs::write(fx.root.join("a").join(PROJECT_INFO_FILE), "{ broken").unwrap();

        fx.store.load_all().unwrap();
        assert_eq!(
            fx.store.project("a").unwrap().info.files(FileRole::Source),
            &[file]
        );
    }

    #[test]
    fn corrupt_workspace_keeps_previous_state() {
        let mut fx = with_projects(&["a"]);
        let ws_file = fx.store.workspace_file().unwrap().to_path_buf();
        fs::write(&ws_file, "garbage").unwrap();
        assert!(fx.store.load_all().is_err());
        assert_eq!(fx.store.projects().len(), 1);
    }

    #[test]
    fn set_top_module_merges() {
        let mut fx = with_projects(&["a"]);
        let file = fx.root.join("a/src/top.v");
        fx.store
            .record_file_event(&FileEvent::new(&file, FileEventKind::Create))
            .unwrap();
        fx.store.set_top_module(Some("core")).unwrap();

        let on_disk = load_project_info(&fx.root.join("a").join(PROJECT_INFO_FILE)).unwrap();
        assert_eq!(on_disk.top_module.as_deref(), Some("core"));
        assert_eq!(on_disk.files(FileRole::Source), &[file]);
    }

    #[test]
    fn set_top_module_requires_active_project() {
        let mut fx = with_projects(&[]);
        let err = fx.store.set_top_module(Some("top")).unwrap_err();
        assert!(matches!(err, StoreError::NoActiveProject));
    }

    #[test]
    fn nested_roots_pick_innermost() {
        let mut fx = with_projects(&["outer"]);
        let inner = fx.root.join("outer/ip");
        fs::create_dir_all(&inner).unwrap();
        fx.store.add_project("inner", &inner).unwrap();
        let owner = fx.store.owning_project(&inner.join("fifo.v")).unwrap();
        assert_eq!(owner.name, "inner");
    }

    #[test]
    fn import_drops_stale_entries() {
        let mut fx = fixture();
        fx.store.init_workspace().unwrap();
        let root = fx.root.join("a");
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/alu.v"), "").unwrap();
        let info = serde_json::json!({
            "sourceFiles": [root.join("gone.v"), "/elsewhere/x.v", root.join("src/alu.v")],
            "topModule": "alu",
        });
        fs::write(root.join(PROJECT_INFO_FILE), info.to_string()).unwrap();

        fx.store.add_project("a", &root).unwrap();
        let on_disk = load_project_info(&root.join(PROJECT_INFO_FILE)).unwrap();
        assert_eq!(on_disk.files(FileRole::Source), &[root.join("src/alu.v")]);
        assert_eq!(on_disk.top_module.as_deref(), Some("alu"));
    }

    #[test]
    fn file_event_starts_from_disk_lists() {
        let mut fx = with_projects(&["a"]);
        let info_path = fx.root.join("a").join(PROJECT_INFO_FILE);
        let board = PathBuf::from("/boards/icebreaker.pcf");
        save_project_info_fields(
            &info_path,
            &ProjectInfo {
                constraints: Some(vec![board.clone()]),
                ..ProjectInfo::default()
            },
            &[InfoField::Constraints],
        )
        .unwrap();

        let sdc = fx.root.join("a/timing.sdc");
        assert!(fx
            .store
            .record_file_event(&FileEvent::new(&sdc, FileEventKind::Create))
            .unwrap());

        let on_disk = load_project_info(&info_path).unwrap();
        assert_eq!(on_disk.files(FileRole::Constraint), &[board.clone(), sdc.clone()]);
        assert_eq!(
            fx.store.project("a").unwrap().info.files(FileRole::Constraint),
            &[board, sdc]
        );
    }

    #[test]
    fn reload_workspace_sees_outside_changes() {
        let mut fx = with_projects(&["a"]);
        let rx = fx.store.bus().subscribe();

        // Another process adds a project and activates it.
        let mut other = ProjectStore::new(&fx.root, Vec::new(), NotificationBus::new());
        other.load_all().unwrap();
        let b = fx.root.join("b");
        fs::create_dir_all(&b).unwrap();
        other.add_project("b", &b).unwrap();
        other.activate("b").unwrap();

        assert!(fx.store.reload_workspace().unwrap());
        assert_eq!(fx.store.active_project().unwrap().name, "b");
        assert_eq!(fx.store.watch_roots().len(), 2);
        let notes: Vec<Notification> = rx.try_iter().collect();
        assert_eq!(notes, vec![Notification::ActiveProjectChanged { name: "b".into() }]);

        // Nothing changed since.
        assert!(!fx.store.reload_workspace().unwrap());
        assert!(rx.try_recv().is_err());
    }
}
