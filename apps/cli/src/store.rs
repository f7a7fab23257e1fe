//! Settings persistence: a JSON file in the platform config directory.

use std::path::{Path, PathBuf};

use sqlcards_core::GameSettings;

use crate::error::Result;

/// Default settings location, e.g. `~/.config/sqlcards/settings.json`.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sqlcards").join("settings.json"))
}

/// Load settings; a missing or corrupt file yields the defaults. Missing
/// individual keys are defaulted by the settings type itself.
pub fn load(path: &Path) -> GameSettings {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        // First run: nothing saved yet.
        Err(_) => return GameSettings::default(),
    };
    match serde_json::from_str(&contents) {
        Ok(settings) => settings,
        Err(error) => {
            tracing::warn!(%error, path = %path.display(), "settings file is corrupt, using defaults");
            GameSettings::default()
        }
    }
}

/// Persist settings, creating the parent directory if needed.
pub fn save(path: &Path, settings: &GameSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, json)?;
    Ok(())
}
