//! Loading and persistence of hdlws workspace and project files.
//!
//! This crate owns the on-disk formats: the `.ews` workspace file listing the
//! configured projects, the per-project `.prjinfo` JSON file, and the optional
//! `hdlws.toml` tool settings. `.prjinfo` files are shared with other tools, so
//! every write goes through [`merge_write_json`], which preserves keys it does
//! not touch.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod settings;
pub mod types;

pub use error::ConfigError;
pub use loader::{
    find_workspace_file, load_project_info, load_workspace, merge_write_json,
    save_project_info_fields, save_workspace, PROJECT_INFO_FILE, WORKSPACE_EXT,
};
pub use settings::{
    load_settings, load_settings_from_str, LayoutSettings, ParserSettings, Settings,
    WatchSettings, SETTINGS_FILE,
};
pub use types::*;
