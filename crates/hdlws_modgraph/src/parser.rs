//! Invocation of the external hierarchy parser and decoding of its output.

use crate::error::ModGraphError;
use crate::instance::{ModuleGraph, ModuleInstance};
use hdlws_config::ParserSettings;
use std::future::Future;
use std::path::Path;

/// Something that turns a `.prjinfo` path into the parser's raw JSON output.
pub trait ModuleParser {
    /// Runs the parser on `project_info` and returns its standard output.
    fn parse(&self, project_info: &Path) -> impl Future<Output = Result<String, ModGraphError>>;
}

/// Runs a parser program as a subprocess.
///
/// The `.prjinfo` path is passed as the final argument; standard output is
/// the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandParser {
    program: String,
    args: Vec<String>,
}

impl CommandParser {
    /// Creates a parser that runs `program` with `args` before the `.prjinfo` path.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Creates a parser from the `[parser]` settings section.
    pub fn from_settings(settings: &ParserSettings) -> Self {
        Self::new(settings.program.clone(), settings.args.clone())
    }
}

impl ModuleParser for CommandParser {
    async fn parse(&self, project_info: &Path) -> Result<String, ModGraphError> {
        tracing::debug!(program = %self.program, info = %project_info.display(), "running parser");
        let output = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .arg(project_info)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ModGraphError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ModGraphError::ParserFailed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        String::from_utf8(output.stdout).map_err(|e| ModGraphError::MalformedOutput {
            reason: e.to_string(),
        })
    }
}

/// Decodes the parser's JSON object, keeping its key order.
pub fn parse_output(text: &str) -> Result<ModuleGraph, ModGraphError> {
    let object: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(text).map_err(|e| ModGraphError::MalformedOutput {
            reason: e.to_string(),
        })?;

    let mut entries = Vec::with_capacity(object.len());
    for (name, value) in object {
        let instance: ModuleInstance =
            serde_json::from_value(value).map_err(|e| ModGraphError::MalformedOutput {
                reason: format!("entry '{name}': {e}"),
            })?;
        entries.push((name, instance));
    }
    Ok(ModuleGraph::new(entries))
}
