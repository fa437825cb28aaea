//! Platform-specific directory utilities

use std::path::PathBuf;

/// Get the platform-specific log directory for pasture
///
/// Follows platform conventions:
/// - macOS: `~/Library/Caches/pasture/logs`
/// - Linux: `~/.cache/pasture/logs` (or `$XDG_CACHE_HOME/pasture/logs`)
/// - Windows: `%LOCALAPPDATA%\pasture\logs`
/// - Fallback: `/tmp/pasture/logs`
pub fn log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "pasture")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/pasture"))
        .join("logs")
}
