use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::components::{BrushSettings, ExportFormat, TextStyle, DEFAULT_ICON_COLOR};
use crate::geometry::{Color, Dimensions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("cannot resolve config directory: neither XDG_CONFIG_HOME nor HOME is set")]
    MissingHomeDirectory,
}

const APP_DIR: &str = "image-editor";
const APP_CONFIG_FILE: &str = "config.json";

/// Editor defaults from `config.json`. Every field is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub max_display: Dimensions,
    pub brush: BrushSettings,
    pub text_style: TextStyle,
    pub icon_color: Color,
    pub export_format: ExportFormat,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_display: Dimensions::new(1000, 800),
            brush: BrushSettings::default(),
            text_style: TextStyle::default(),
            icon_color: DEFAULT_ICON_COLOR,
            export_format: ExportFormat::default(),
        }
    }
}

pub fn load_editor_config() -> EditorConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_editor_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_editor_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> EditorConfig {
    match editor_config_path(xdg_config_home, home) {
        Ok(path) => load_editor_config_from(&path),
        Err(err) => {
            tracing::warn!(%err, "using default editor config");
            EditorConfig::default()
        }
    }
}

/// Reads `path`, falling back to defaults when it is missing or malformed.
pub fn load_editor_config_from(path: &Path) -> EditorConfig {
    if !path.exists() {
        return EditorConfig::default();
    }
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            EditorConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            EditorConfig::default()
        }
    }
}

pub fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub fn editor_config_path(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(APP_DIR);
    path.push(APP_CONFIG_FILE);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}
