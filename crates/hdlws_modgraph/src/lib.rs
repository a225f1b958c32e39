//! Module hierarchy cache for the active project.
//!
//! The hierarchy itself is produced by an external parser process that reads
//! the active project's `.prjinfo` and prints a JSON object of module
//! instances. [`ModuleGraphCache`] holds the last successful parse, replacing
//! it wholesale on every reload, and tracks which module is the top.

#![warn(missing_docs)]

pub mod cache;
pub mod error;
pub mod instance;
pub mod parser;

pub use cache::{ModuleGraphCache, ReloadOutcome, ReloadRequest};
pub use error::ModGraphError;
pub use instance::{ModuleGraph, ModuleInstance, SourceLocation};
pub use parser::{parse_output, CommandParser, ModuleParser};
