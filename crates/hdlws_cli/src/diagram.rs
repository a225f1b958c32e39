//! `hdlws diagram` and `hdlws serve`.

use crate::session::Session;
use hdlws_diagram::{DiagramEngine, ViewEvent, ViewRequest};
use std::path::Path;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Lays out part of the hierarchy once and prints the scene as JSON.
///
/// `path` is a dotted instance path below the top module; empty selects the
/// top module itself. With `submodules`, the instance's children are drawn
/// instead of the instance.
pub async fn run(
    root: &Path,
    path: &str,
    submodules: bool,
) -> Result<i32, Box<dyn std::error::Error>> {
    let mut session = Session::open(root)?;
    if session.store.active_project().is_none() {
        println!("{}", serde_json::to_string(&ViewEvent::CreateProject)?);
        return Ok(0);
    }
    session.reload().await?;

    let instance = session
        .cache
        .find(path)
        .ok_or_else(|| format!("no instance at '{path}'"))?
        .clone();
    let request = if submodules {
        ViewRequest::RenderSubmodules(instance)
    } else {
        ViewRequest::RenderSingleModule(instance)
    };

    let mut engine = DiagramEngine::new(session.settings.layout.clone());
    let scene = engine.handle(request);
    println!("{}", serde_json::to_string_pretty(&scene)?);
    Ok(0)
}

/// Answers view requests read line by line from stdin.
///
/// Each input line is one request; each answer is one line of scene JSON.
/// Lines that do not decode are logged and skipped. When the workspace has
/// no active project a single `createProject` event is written first.
pub async fn serve(root: &Path) -> Result<i32, Box<dyn std::error::Error>> {
    let session = Session::open(root)?;
    let mut stdout = tokio::io::stdout();

    if session.store.active_project().is_none() {
        let line = serde_json::to_string(&ViewEvent::CreateProject)?;
        write_line(&mut stdout, &line).await?;
    }

    let mut engine = DiagramEngine::new(session.settings.layout.clone());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<ViewRequest>(&line) {
            Ok(request) => {
                let scene = engine.handle(request);
                write_line(&mut stdout, &serde_json::to_string(&scene)?).await?;
            }
            Err(e) => tracing::warn!(error = %e, "ignoring malformed view request"),
        }
    }
    Ok(0)
}

async fn write_line(stdout: &mut tokio::io::Stdout, line: &str) -> std::io::Result<()> {
    stdout.write_all(line.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await
}
