//! Filesystem adapters for Keepsake.
//!
//! Data directory resolution and the JSON file memory backend.

pub mod memory;

use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "KEEPSAKE_DATA_DIR";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `KEEPSAKE_DATA_DIR` environment variable
/// 2. `~/.keepsake`
/// 3. `.keepsake` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".keepsake");
    }

    PathBuf::from(".keepsake")
}
