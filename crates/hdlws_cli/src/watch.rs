//! `hdlws watch`: keep `.prjinfo` files and the module graph in sync.

use crate::session::Session;
use hdlws_config::find_workspace_file;
use hdlws_modgraph::{ModuleGraphCache, ReloadOutcome};
use hdlws_project::{FileEvent, FileWatchBridge, ProjectStore, StoreError};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Watches every project root until the process is interrupted.
///
/// Changes other processes make to the workspace file (new projects, a
/// different active project) are picked up on the next tick.
pub async fn run(root: &Path) -> Result<i32, Box<dyn std::error::Error>> {
    let mut session = Session::open(root)?;
    let notes = session.bus.subscribe();
    let mut bridge = FileWatchBridge::new();
    let watched = bridge.rewatch(&session.store)?;
    tracing::info!(roots = watched, "watching project roots");
    let mut stamp = WorkspaceStamp::read(session.store.workspace_root());

    if session.store.active_project().is_some() {
        reload(&mut session).await;
    }

    let mut ticker = tokio::time::interval(POLL_INTERVAL);
    loop {
        ticker.tick().await;

        if let Err(e) = sync_workspace(&mut session.store, &mut bridge, &mut stamp) {
            tracing::warn!(error = %e, "could not reload workspace");
        }

        let events = bridge.forward(&mut session.store);
        let mut stale = events_need_reload(&session.store, &events);

        for note in notes.try_iter() {
            tracing::debug!(?note, "notification");
            stale |= ModuleGraphCache::invalidated_by(&note);
        }

        if stale {
            reload(&mut session).await;
        }
    }
}

/// Path and contents of the workspace file when it was last read.
#[derive(Debug, Default, PartialEq, Eq)]
struct WorkspaceStamp(Option<(PathBuf, String)>);

impl WorkspaceStamp {
    fn read(root: &Path) -> Self {
        Self(find_workspace_file(root).and_then(|path| {
            let content = fs::read_to_string(&path).ok()?;
            Some((path, content))
        }))
    }
}

/// Re-reads the workspace if its file appeared or changed since `stamp`,
/// re-registering watchers when the project roots moved.
///
/// Returns `true` if the workspace was re-read.
fn sync_workspace(
    store: &mut ProjectStore,
    bridge: &mut FileWatchBridge,
    stamp: &mut WorkspaceStamp,
) -> Result<bool, StoreError> {
    let current = WorkspaceStamp::read(store.workspace_root());
    if current == *stamp {
        return Ok(false);
    }
    *stamp = current;
    if store.reload_workspace()? {
        let watched = bridge.rewatch(store)?;
        tracing::info!(roots = watched, "project roots changed");
    }
    Ok(true)
}

fn events_need_reload(store: &ProjectStore, events: &[FileEvent]) -> bool {
    for event in events {
        tracing::info!(path = %event.path.display(), kind = ?event.kind, "file event");
    }
    events
        .iter()
        .any(|event| ModuleGraphCache::needs_reload(store, event))
}

async fn reload(session: &mut Session) {
    match session.reload().await {
        Ok(ReloadOutcome::Applied { top }) => {
            let modules = session.cache.flat_list().len();
            tracing::info!(top = ?top, modules, "hierarchy up to date");
        }
        Ok(ReloadOutcome::Superseded) => {}
        Err(e) => tracing::warn!(error = %e, "hierarchy reload failed"),
    }
}
