//! Platform-specific paths for configuration.
//!
//! - **User config**: `~/.config/texgraph/` (Linux), `~/Library/Application Support/texgraph/` (macOS), `%APPDATA%\texgraph\` (Windows)
//! - **Settings file**: `settings.toml` inside the user config directory

use std::path::PathBuf;

/// Application name used for directory paths.
const APP_NAME: &str = "texgraph";

/// File name of the settings file.
const SETTINGS_FILE: &str = "settings.toml";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the path of the user settings file.
pub fn settings_path() -> PathBuf {
    user_config_dir().join(SETTINGS_FILE)
}
