//! Shared path helpers for the settings file.

use std::path::{Path, PathBuf};

/// Environment variable that overrides the settings file location.
pub const SETTINGS_ENV_VAR: &str = "AITAGGER_SETTINGS";

/// Gets the cross-platform settings path.
///
/// Returns `{config_dir}/aitagger/settings.json` where `config_dir` is:
/// - Linux: `~/.config`
/// - macOS: `~/Library/Application Support`
/// - Windows: `C:\Users\<user>\AppData\Roaming`
///
/// Returns `None` when the config directory cannot be determined.
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("aitagger").join("settings.json"))
}

/// Resolves the settings file: explicit path, then `AITAGGER_SETTINGS`, then
/// the platform default.
pub fn settings_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    match std::env::var(SETTINGS_ENV_VAR) {
        Ok(path) if !path.trim().is_empty() => Some(PathBuf::from(path.trim())),
        _ => default_settings_path(),
    }
}

/// Ensures the parent directory of `path` exists.
pub fn ensure_parent_directory(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
