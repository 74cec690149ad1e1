//! User configuration file loading
//!
//! An optional TOML file controls the adapter table: extra programs can
//! be declared, built-in path lists overridden, or the built-in table
//! disabled entirely.
//!
//! ```toml
//! use_builtins = true
//!
//! [programs]
//! kitty = ["~/.config/kitty/kitty.conf"]
//! vim = ["~/.config/vim/vimrc"]
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// User configuration controlling the adapter table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Whether the built-in adapter table is used as the base
    #[serde(default = "default_use_builtins")]
    pub use_builtins: bool,

    /// Additional programs and their configuration file paths
    ///
    /// An entry with the same name as a built-in program replaces its
    /// path list.
    #[serde(default)]
    pub programs: BTreeMap<String, Vec<String>>,
}

const fn default_use_builtins() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            use_builtins: true,
            programs: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load configuration from an explicit path or the default location
    ///
    /// An explicit path must exist and parse. When no path is given the
    /// default location is tried; if nothing is there the default
    /// configuration is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file cannot be read or parsed.
    pub fn load(cli_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = cli_path {
            return Self::from_file(path);
        }

        match Self::default_location() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Default config file location under the platform config directory
    #[must_use]
    pub fn default_location() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dotkeep").join("config.toml"))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}
