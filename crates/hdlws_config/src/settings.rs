//! Tool settings read from an optional `hdlws.toml` at the workspace root.

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

/// File name of the settings file.
pub const SETTINGS_FILE: &str = "hdlws.toml";

/// All tool settings. Every section and field has a default.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// File watching settings.
    pub watch: WatchSettings,
    /// Module hierarchy parser invocation.
    pub parser: ParserSettings,
    /// Diagram layout geometry.
    pub layout: LayoutSettings,
}

/// Settings for file watching.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WatchSettings {
    /// Directory prefixes, relative to a project root, whose events are ignored.
    pub exclude: Vec<String>,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            exclude: vec!["build".to_string()],
        }
    }
}

/// Command line of the external hierarchy parser.
///
/// The `.prjinfo` path is appended after `args` as the final argument.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
    /// Program to execute.
    pub program: String,
    /// Arguments passed before the `.prjinfo` path.
    pub args: Vec<String>,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            program: "python3".to_string(),
            args: vec!["parse_sources.py".to_string()],
        }
    }
}

/// Geometry of the block diagram, in canvas units.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Grid cell size every block position snaps to.
    pub grid: f64,
    /// Width of every block.
    pub block_width: f64,
    /// Height allotted to each port row.
    pub port_height: f64,
    /// Vertical gap between port rows.
    pub port_margin: f64,
    /// Minimum block height.
    pub min_height: f64,
    /// Gap between blocks in the initial row layout.
    pub spacing: f64,
    /// Length of the first horizontal wire segment leaving an anchor.
    pub wire_stub: f64,
    /// Extra stub length per wire lane.
    pub lane_gap: f64,
    /// Radius of the marker drawn at each port anchor.
    pub anchor_radius: f64,
    /// Canvas width at which the free-cell search wraps to the next row.
    pub canvas_width: f64,
    /// Number of rows the free-cell search scans before rejecting a move.
    pub max_search_rows: u32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            grid: 100.0,
            block_width: 250.0,
            port_height: 30.0,
            port_margin: 10.0,
            min_height: 150.0,
            spacing: 50.0,
            wire_stub: 20.0,
            lane_gap: 10.0,
            anchor_radius: 5.0,
            canvas_width: 2000.0,
            max_search_rows: 50,
        }
    }
}

/// Loads `<workspace_root>/hdlws.toml`, falling back to defaults when absent.
pub fn load_settings(workspace_root: &Path) -> Result<Settings, ConfigError> {
    let path = workspace_root.join(SETTINGS_FILE);
    match std::fs::read_to_string(&path) {
        Ok(content) => load_settings_from_str(&content).map_err(|e| match e {
            ConfigError::Parse { reason, .. } => ConfigError::Parse { path, reason },
            other => other,
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Settings::default()),
        Err(source) => Err(ConfigError::Io { path, source }),
    }
}

/// Parses and validates settings from a TOML string.
pub fn load_settings_from_str(content: &str) -> Result<Settings, ConfigError> {
    let settings: Settings = toml::from_str(content).map_err(|e| ConfigError::Parse {
        path: SETTINGS_FILE.into(),
        reason: e.to_string(),
    })?;
    validate_settings(&settings)?;
    Ok(settings)
}

fn validate_settings(settings: &Settings) -> Result<(), ConfigError> {
    if settings.parser.program.is_empty() {
        return Err(ConfigError::ValidationError(
            "parser.program must not be empty".to_string(),
        ));
    }
    let layout = &settings.layout;
    for (name, value) in [
        ("layout.grid", layout.grid),
        ("layout.block_width", layout.block_width),
        ("layout.port_height", layout.port_height),
        ("layout.min_height", layout.min_height),
    ] {
        if !(value > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "{name} must be positive"
            )));
        }
    }
    if layout.canvas_width < layout.block_width {
        return Err(ConfigError::ValidationError(
            "layout.canvas_width must be at least layout.block_width".to_string(),
        ));
    }
    Ok(())
}
