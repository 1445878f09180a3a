//! Path resolution helpers.
//!
//! Supports "~" home directory expansion and locating the status file in the
//! temporary directory Talon writes to.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{BridgeError, Result};

/// Expand a leading `~` to the user's home directory. Other paths are
/// returned unchanged.
pub fn expand_home(path: &Path) -> Result<PathBuf> {
    trace!(path = %path.display(), "Resolving path");

    let path_str = path.to_string_lossy();
    if path_str == "~" || path_str.starts_with("~/") {
        let home = home_dir()?;
        let rest = path_str.strip_prefix("~/").unwrap_or("");
        let resolved = if rest.is_empty() { home } else { home.join(rest) };
        debug!(
            original = %path.display(),
            resolved = %resolved.display(),
            "Expanded home directory path"
        );
        return Ok(resolved);
    }

    Ok(path.to_path_buf())
}

/// Resolve the user's home directory (cross-platform).
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| {
        BridgeError::ConfigInvalid("Could not determine home directory".to_string())
    })
}

/// Temporary directory Talon writes its status file to.
///
/// `TMPDIR` when set and non-empty, else the platform temp dir.
#[must_use]
pub fn status_dir() -> PathBuf {
    match std::env::var_os("TMPDIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => std::env::temp_dir(),
    }
}

/// True if a changed path reported by the file watcher is the status file.
#[must_use]
pub fn is_status_path(path: &Path, file_name: &str) -> bool {
    let suffix = format!("{}{file_name}", std::path::MAIN_SEPARATOR);
    path.to_string_lossy().ends_with(&suffix)
}
