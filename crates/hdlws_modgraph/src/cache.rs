//! The module graph cache and its reload protocol.
//!
//! A reload is split into three steps so that several may be in flight:
//! [`ModuleGraphCache::begin_reload`] issues a numbered request, the caller
//! runs the parser, and [`ModuleGraphCache::complete_reload`] applies the
//! result only if no newer request has been issued since. Parse failures
//! never touch the cached hierarchy.

use crate::error::ModGraphError;
use crate::instance::{ModuleGraph, ModuleInstance};
use crate::parser::{parse_output, ModuleParser};
use hdlws_common::{is_excluded, is_hdl_source, Notification, NotificationBus};
use hdlws_project::{FileEvent, ProjectStore};
use std::path::PathBuf;

/// A reload that has been issued but not yet applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadRequest {
    /// Sequence number; only the most recent request may be applied.
    pub generation: u64,
    /// The project being parsed.
    pub project: String,
    /// The `.prjinfo` path handed to the parser.
    pub project_info: PathBuf,
}

/// What happened to a completed reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// The cache now holds the new hierarchy.
    Applied {
        /// The selected top module, if the parse produced any modules.
        top: Option<String>,
    },
    /// A newer request was issued first; the result was discarded.
    Superseded,
}

/// Holds the last successfully parsed module hierarchy.
pub struct ModuleGraphCache {
    graph: Option<ModuleGraph>,
    top: Option<String>,
    issued: u64,
    bus: NotificationBus,
}

impl ModuleGraphCache {
    /// Creates an empty cache publishing on `bus`.
    pub fn new(bus: NotificationBus) -> Self {
        Self {
            graph: None,
            top: None,
            issued: 0,
            bus,
        }
    }

    /// Name of the top module.
    pub fn top_module(&self) -> Option<&str> {
        self.top.as_deref()
    }

    /// The instance tree rooted at the top module.
    pub fn hierarchy(&self) -> Option<&ModuleInstance> {
        let top = self.top.as_deref()?;
        self.graph.as_ref()?.get(top)
    }

    /// Every top-level entry of the last parse, in parser order.
    pub fn flat_list(&self) -> Vec<&ModuleInstance> {
        self.graph
            .as_ref()
            .map(|g| g.instances().collect())
            .unwrap_or_default()
    }

    /// The full parse result, if any parse has succeeded.
    pub fn graph(&self) -> Option<&ModuleGraph> {
        self.graph.as_ref()
    }

    /// Resolves a dotted instance path below the hierarchy root.
    pub fn find(&self, dotted: &str) -> Option<&ModuleInstance> {
        self.hierarchy()?.find(dotted)
    }

    /// Issues a reload for the store's active project.
    ///
    /// Fails without side effects when there is no active project.
    pub fn begin_reload(&mut self, store: &ProjectStore) -> Result<ReloadRequest, ModGraphError> {
        let Some(project) = store.active_project() else {
            tracing::error!("cannot load module hierarchy without an active project");
            return Err(ModGraphError::NoActiveProject);
        };
        self.issued += 1;
        Ok(ReloadRequest {
            generation: self.issued,
            project: project.name.clone(),
            project_info: project.project_info_path.clone(),
        })
    }

    /// Applies the parser result for `request`.
    ///
    /// Results of superseded requests are dropped. Parser errors and malformed
    /// output leave the cache unchanged. On success the hierarchy is replaced
    /// in full and the top module is the project's persisted `topModule`, or
    /// the first entry of the parse when none is persisted.
    pub fn complete_reload(
        &mut self,
        store: &ProjectStore,
        request: &ReloadRequest,
        output: Result<String, ModGraphError>,
    ) -> Result<ReloadOutcome, ModGraphError> {
        if request.generation != self.issued {
            tracing::debug!(
                generation = request.generation,
                latest = self.issued,
                "discarding superseded reload"
            );
            return Ok(ReloadOutcome::Superseded);
        }

        let graph = output.and_then(|text| parse_output(&text)).map_err(|e| {
            tracing::error!(project = %request.project, error = %e, "module hierarchy reload failed");
            e
        })?;

        let persisted = store
            .project(&request.project)
            .and_then(|p| p.info.top_module.clone());
        let top = persisted.or_else(|| graph.first_name().map(str::to_string));

        tracing::info!(
            project = %request.project,
            modules = graph.len(),
            top = ?top,
            "module hierarchy loaded"
        );
        self.graph = Some(graph);
        self.top = top.clone();
        self.bus.publish(Notification::HierarchyReloaded {
            top: top.clone().unwrap_or_default(),
        });
        Ok(ReloadOutcome::Applied { top })
    }

    /// Runs a full reload with `parser`.
    pub async fn reload<P: ModuleParser>(
        &mut self,
        store: &ProjectStore,
        parser: &P,
    ) -> Result<ReloadOutcome, ModGraphError> {
        let request = self.begin_reload(store)?;
        let output = parser.parse(&request.project_info).await;
        self.complete_reload(store, &request, output)
    }

    /// Selects `name` as the top module and persists it to the active project.
    ///
    /// Does not reparse; subscribers receive a top-module change rather than
    /// a reload notification.
    pub fn set_top_module(
        &mut self,
        store: &mut ProjectStore,
        name: &str,
    ) -> Result<(), ModGraphError> {
        if let Some(graph) = &self.graph {
            if graph.get(name).is_none() {
                return Err(ModGraphError::UnknownModule(name.to_string()));
            }
        }
        store.set_top_module(Some(name))?;
        self.top = Some(name.to_string());
        self.bus.publish(Notification::TopModuleChanged {
            top: name.to_string(),
        });
        Ok(())
    }

    /// Returns `true` if a file event should trigger a reload.
    ///
    /// Only HDL sources of the active project count; generated files under
    /// excluded directories do not.
    pub fn needs_reload(store: &ProjectStore, event: &FileEvent) -> bool {
        if !is_hdl_source(&event.path) {
            return false;
        }
        let (Some(owner), Some(active)) = (store.owning_project(&event.path), store.active_project())
        else {
            return false;
        };
        owner.name == active.name
            && !is_excluded(&event.path, &owner.project_root, store.excluded())
    }

    /// Returns `true` if a store notification should trigger a reload.
    pub fn invalidated_by(notification: &Notification) -> bool {
        matches!(notification, Notification::ActiveProjectChanged { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdlws_project::FileEventKind;
    use std::path::Path;

    struct CannedParser(&'static str);

    impl ModuleParser for CannedParser {
        async fn parse(&self, _project_info: &Path) -> Result<String, ModGraphError> {
            Ok(self.0.to_string())
        }
    }

    const SINGLE_TOP: &str =
        r#"{"top": {"instance_name":"top","module_name":"m","ports":[],"submodules":[]}}"#;

    const TWO_MODULES: &str = r#"{
        "uart": {"instance_name":"uart","module_name":"uart","ports":["tx(tx)"],"submodules":[]},
        "soc": {"instance_name":"soc","module_name":"soc","ports":[],"submodules":[
            {"instance_name":"u_uart","module_name":"uart","ports":["tx(pin)"],"submodules":[]}
        ]}
    }"#;

    fn store_with_project(dir: &Path) -> ProjectStore {
        let mut store = ProjectStore::new(dir, Vec::new(), NotificationBus::new());
        store.init_workspace().unwrap();
        let root = dir.join("proj");
        std::fs::create_dir_all(&root).unwrap();
        store.add_project("proj", &root).unwrap();
        store
    }

    #[tokio::test]
    async fn reload_defaults_to_first_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with_project(dir.path());
        let mut cache = ModuleGraphCache::new(NotificationBus::new());

        let outcome = cache.reload(&store, &CannedParser(SINGLE_TOP)).await.unwrap();
        assert_eq!(
            outcome,
            ReloadOutcome::Applied {
                top: Some("top".into())
            }
        );
        assert_eq!(cache.top_module(), Some("top"));
        assert_eq!(cache.hierarchy().unwrap().module_name, "m");
    }

    #[tokio::test]
    async fn persisted_top_is_authoritative() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_with_project(dir.path());
        store.set_top_module(Some("soc")).unwrap();
        let mut cache = ModuleGraphCache::new(NotificationBus::new());

        cache.reload(&store, &CannedParser(TWO_MODULES)).await.unwrap();
        assert_eq!(cache.top_module(), Some("soc"));
        assert_eq!(cache.find("u_uart").unwrap().ports, vec!["tx(pin)"]);
        assert_eq!(cache.flat_list().len(), 2);
    }

    #[tokio::test]
    async fn malformed_output_keeps_last_good() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with_project(dir.path());
        let mut cache = ModuleGraphCache::new(NotificationBus::new());
        cache.reload(&store, &CannedParser(SINGLE_TOP)).await.unwrap();

        let err = cache
            .reload(&store, &CannedParser("not json"))
            .await
            .unwrap_err();
        assert!(matches!(err, ModGraphError::MalformedOutput { .. }));
        assert_eq!(cache.top_module(), Some("top"));
        assert!(cache.hierarchy().is_some());
    }

    #[test]
    fn no_active_project_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProjectStore::new(dir.path(), Vec::new(), NotificationBus::new());
        let mut cache = ModuleGraphCache::new(NotificationBus::new());
        let err = cache.begin_reload(&store).unwrap_err();
        assert!(matches!(err, ModGraphError::NoActiveProject));
        assert!(cache.graph().is_none());
    }

    #[test]
    fn superseded_result_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with_project(dir.path());
        let mut cache = ModuleGraphCache::new(NotificationBus::new());

        let first = cache.begin_reload(&store).unwrap();
        let second = cache.begin_reload(&store).unwrap();
        assert!(second.generation > first.generation);

        // The newer request finishes first; the older one arrives late.
        let applied = cache
            .complete_reload(&store, &second, Ok(SINGLE_TOP.to_string()))
            .unwrap();
        assert!(matches!(applied, ReloadOutcome::Applied { .. }));
        let late = cache
            .complete_reload(&store, &first, Ok(TWO_MODULES.to_string()))
            .unwrap();
        assert_eq!(late, ReloadOutcome::Superseded);
        assert_eq!(cache.top_module(), Some("top"));
    }

    #[test]
    fn parser_error_keeps_cache() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with_project(dir.path());
        let mut cache = ModuleGraphCache::new(NotificationBus::new());
        let request = cache.begin_reload(&store).unwrap();
        let err = cache
            .complete_reload(
                &store,
                &request,
                Err(ModGraphError::ParserFailed {
                    code: Some(1),
                    stderr: String::new(),
                }),
            )
            .unwrap_err();
        assert!(matches!(err, ModGraphError::ParserFailed { .. }));
        assert!(cache.graph().is_none());
    }

    #[tokio::test]
    async fn set_top_module_persists_and_notifies() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_with_project(dir.path());
        let bus = NotificationBus::new();
        let rx = bus.subscribe();
        let mut cache = ModuleGraphCache::new(bus);
        cache.reload(&store, &CannedParser(TWO_MODULES)).await.unwrap();
        assert_eq!(cache.top_module(), Some("uart"));

        cache.set_top_module(&mut store, "soc").unwrap();
        assert_eq!(cache.top_module(), Some("soc"));
        assert_eq!(
            store.active_project().unwrap().info.top_module.as_deref(),
            Some("soc")
        );

        let notes: Vec<Notification> = rx.try_iter().collect();
        assert_eq!(
            notes,
            vec![
                Notification::HierarchyReloaded { top: "uart".into() },
                Notification::TopModuleChanged { top: "soc".into() },
            ]
        );
    }

    #[tokio::test]
    async fn set_unknown_top_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_with_project(dir.path());
        let mut cache = ModuleGraphCache::new(NotificationBus::new());
        cache.reload(&store, &CannedParser(SINGLE_TOP)).await.unwrap();
        let err = cache.set_top_module(&mut store, "nope").unwrap_err();
        assert!(matches!(err, ModGraphError::UnknownModule(_)));
        assert!(store.active_project().unwrap().info.top_module.is_none());
    }

    #[test]
    fn invalidation_triggers() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let mut store = ProjectStore::new(root, vec!["build".to_string()], NotificationBus::new());
        store.init_workspace().unwrap();
        for name in ["a", "b"] {
            std::fs::create_dir_all(root.join(name)).unwrap();
            store.add_project(name, &root.join(name)).unwrap();
        }
        let modify = |path: &str| FileEvent::new(root.join(path), FileEventKind::Modify);

        assert!(ModuleGraphCache::needs_reload(&store, &modify("a/top.sv")));
        assert!(!ModuleGraphCache::needs_reload(&store, &modify("a/pins.pcf")));
        assert!(!ModuleGraphCache::needs_reload(&store, &modify("a/build/netlist.v")));
        assert!(!ModuleGraphCache::needs_reload(&store, &modify("b/core.v")));
        assert!(!ModuleGraphCache::needs_reload(
            &store,
            &FileEvent::new("/elsewhere/x.v", FileEventKind::Modify)
        ));
        assert!(ModuleGraphCache::invalidated_by(
            &Notification::ActiveProjectChanged { name: "a".into() }
        ));
        assert!(!ModuleGraphCache::invalidated_by(&Notification::TreeChanged {
            project: "a".into()
        }));
    }
}
