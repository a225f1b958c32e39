//! Error types for module hierarchy loading.

use hdlws_project::StoreError;

/// Errors that can occur while loading or updating the module hierarchy.
///
/// None of these modify the cache: the last good hierarchy stays in place.
#[derive(Debug, thiserror::Error)]
pub enum ModGraphError {
    /// There is no active project to parse.
    #[error("no active project; cannot load module hierarchy")]
    NoActiveProject,

    /// The parser process could not be started.
    #[error("failed to run parser `{program}`: {source}")]
    Spawn {
        /// The program that failed to start.
        program: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The parser exited unsuccessfully.
    #[error("parser exited with {}: {stderr}", exit_description(.code))]
    ParserFailed {
        /// Exit code, if the process exited normally.
        code: Option<i32>,
        /// Captured standard error.
        stderr: String,
    },

    /// The parser output was not a JSON object of module instances.
    #[error("malformed parser output: {reason}")]
    MalformedOutput {
        /// Description of the problem.
        reason: String,
    },

    /// A module name is not part of the loaded hierarchy.
    #[error("module '{0}' is not in the loaded hierarchy")]
    UnknownModule(String),

    /// Persisting through the project store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {c}"),
        None => "a signal".to_string(),
    }
}
