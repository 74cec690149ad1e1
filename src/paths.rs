//! Home directory path expansion
//!
//! Declared adapter paths and CLI-supplied paths may use `~/` shorthand
//! for the home directory. Expansion happens at the last moment before
//! touching the filesystem; already-absolute paths pass through unchanged.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::error::Result;

/// Expand a leading `~` against the home directory
///
/// Paths without the shorthand are returned unchanged.
///
/// # Errors
///
/// Returns an error if the path uses `~` and the home directory cannot
/// be determined.
pub fn expand_home(path: &str) -> Result<PathBuf> {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = home_dir()?;
        Ok(home.join(rest))
    } else if path == "~" {
        home_dir()
    } else {
        Ok(PathBuf::from(path))
    }
}

/// Expand a leading `~` in a CLI-supplied path
///
/// Non-UTF-8 paths cannot contain the shorthand and pass through as-is.
///
/// # Errors
///
/// Returns an error if the path uses `~` and the home directory cannot
/// be determined.
pub fn expand_home_path(path: &Path) -> Result<PathBuf> {
    match path.to_str() {
        Some(s) => expand_home(s),
        None => Ok(path.to_path_buf()),
    }
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().context("Failed to determine home directory")
}
