//! Configuration and data paths
//!
//! Uses the directories crate for platform-appropriate locations.

use std::io;
use std::path::PathBuf;

/// Application name used for config and data directories
const APP_NAME: &str = "billed";

/// Get the configuration directory path
///
/// - Linux: `~/.config/billed/`
/// - macOS: `~/Library/Application Support/billed/`
/// - Windows: `%APPDATA%\billed\`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the data directory path
pub fn data_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.data_dir().to_path_buf())
}

/// Get the path of the file backing local storage (session, jwt)
pub fn local_storage_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("local_storage.json"))
}

/// Ensure the parent directory of `path` exists
pub fn ensure_parent_dir(path: &std::path::Path) -> io::Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            std::fs::create_dir_all(dir)?;
        }
    }
    Ok(())
}
