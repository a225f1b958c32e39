//! Shared state for one command invocation.

use hdlws_common::NotificationBus;
use hdlws_config::{load_settings, Settings};
use hdlws_modgraph::{CommandParser, ModGraphError, ModuleGraphCache, ReloadOutcome};
use hdlws_project::ProjectStore;
use std::path::{Path, PathBuf};

/// The store, module graph cache, and settings of one workspace.
///
/// Built once per command and passed to whatever needs it; the store and
/// cache publish on the same bus.
pub struct Session {
    /// Tool settings from `hdlws.toml`.
    pub settings: Settings,
    /// Bus shared by the store and the cache.
    pub bus: NotificationBus,
    /// Workspace and project state.
    pub store: ProjectStore,
    /// Last parsed module hierarchy.
    pub cache: ModuleGraphCache,
    /// Parser collaborator.
    pub parser: CommandParser,
}

impl Session {
    /// Opens the workspace at `root` and loads its projects.
    pub fn open(root: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let settings = load_settings(root)?;
        let bus = NotificationBus::new();
        let mut store = ProjectStore::new(root, settings.watch.exclude.clone(), bus.clone());
        store.load_all()?;
        let cache = ModuleGraphCache::new(bus.clone());
        let parser = CommandParser::from_settings(&settings.parser);
        Ok(Self {
            settings,
            bus,
            store,
            cache,
            parser,
        })
    }

    /// Reparses the active project.
    pub async fn reload(&mut self) -> Result<ReloadOutcome, ModGraphError> {
        self.cache.reload(&self.store, &self.parser).await
    }
}

/// The workspace directory: `--workspace` if given, else the current directory.
pub fn workspace_root(flag: Option<&Path>) -> std::io::Result<PathBuf> {
    let root = match flag {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir()?,
    };
    std::path::absolute(root)
}
