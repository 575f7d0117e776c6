use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const APP_DIR: &str = "pyide";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub(crate) struct Settings {
    #[serde(default)]
    pub(crate) theme_name: Option<String>,
    #[serde(default)]
    pub(crate) files_pane_width: Option<u16>,
    #[serde(default)]
    pub(crate) output_pane_width: Option<u16>,
    /// Interpreter program; `python3` when unset.
    #[serde(default)]
    pub(crate) python: Option<String>,
    /// Where downloads are written; the working directory when unset.
    #[serde(default)]
    pub(crate) download_dir: Option<PathBuf>,
}

/// `pyide/` below `$XDG_CONFIG_HOME`, `%APPDATA%` or `~/.config`.
pub(crate) fn config_dir() -> Option<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME")
        && !xdg.is_empty()
    {
        return Some(PathBuf::from(xdg).join(APP_DIR));
    }
    if let Ok(appdata) = std::env::var("APPDATA")
        && !appdata.is_empty()
    {
        return Some(PathBuf::from(appdata).join(APP_DIR));
    }
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".config").join(APP_DIR))
}

pub(crate) fn settings_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(SETTINGS_FILE))
}

pub(crate) fn parse_settings(raw: &str) -> io::Result<Settings> {
    serde_json::from_str(raw).map_err(|e| io::Error::other(format!("parse settings: {e}")))
}

pub(crate) fn load_settings() -> Settings {
    let Some(path) = settings_path() else {
        return Settings::default();
    };
    let Ok(raw) = fs::read_to_string(&path) else {
        return Settings::default();
    };
    match parse_settings(&raw) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable settings");
            Settings::default()
        }
    }
}

pub(crate) fn save_settings(settings: &Settings) -> io::Result<()> {
    let Some(path) = settings_path() else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let raw = serde_json::to_string_pretty(settings)
        .map_err(|e| io::Error::other(format!("serialize settings: {e}")))?;
    fs::write(path, raw)
}
