//! Well-known program adapters and the adapter registry
//!
//! An adapter pairs a program name with the configuration files the
//! program is known to keep, declared with `~/` shorthand for paths under
//! the home directory. The registry is built once at startup from the
//! built-in table plus the user configuration and never changes
//! afterwards.

use std::fs;
use std::io;

use anyhow::Context;

use crate::config::Config;
use crate::error::Result;
use crate::paths;

/// Built-in table of programs and their conventional configuration files
const BUILTIN_PROGRAMS: &[(&str, &[&str])] = &[
    ("bash", &["~/.bash_profile", "~/.bashrc", "~/.profile"]),
    ("zsh", &["~/.zshrc", "~/.zlogin"]),
    ("oh-my-zsh", &["~/.oh-my-zsh/custom/aliases.zsh"]),
    ("vim", &["~/.vimrc"]),
    ("neovim", &["~/.config/nvim/init.vim", "~/.config/nvim/init.lua"]),
    ("git", &["~/.gitconfig", "~/.config/git/config"]),
    ("tmux", &["~/.tmux.conf"]),
    (
        "vscode",
        &[
            "~/.config/Code/User/settings.json",
            "~/.config/Code/User/keybindings.json",
        ],
    ),
];

/// A program and the configuration files it is known to keep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adapter {
    name: String,
    paths: Vec<String>,
}

impl Adapter {
    /// Create an adapter for a program with its declared paths
    #[must_use]
    pub fn new(name: impl Into<String>, paths: Vec<String>) -> Self {
        Self {
            name: name.into(),
            paths,
        }
    }

    /// Program name, used as the grouping key in exports
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared configuration file paths, possibly using `~/` shorthand
    #[must_use]
    pub fn declared_paths(&self) -> &[String] {
        &self.paths
    }

    /// Read the declared files that exist on disk
    ///
    /// Returns `(expanded path, content)` pairs in declaration order.
    /// A missing file produces no entry and no error.
    ///
    /// # Errors
    ///
    /// Returns an error if a file exists but cannot be read, or if a
    /// `~/` path cannot be expanded.
    pub fn read_existing_files(&self) -> Result<Vec<(String, String)>> {
        let mut files = Vec::new();

        for declared in &self.paths {
            let expanded = paths::expand_home(declared)?;
            match fs::read_to_string(&expanded) {
                Ok(content) => {
                    files.push((expanded.to_string_lossy().into_owned(), content));
                }
                // Absent files are expected and skipped; every other
                // read failure is fatal.
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("Failed to read {}", expanded.display())
                    });
                }
            }
        }

        Ok(files)
    }
}

/// Ordered collection of all registered adapters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterRegistry {
    adapters: Vec<Adapter>,
}

impl AdapterRegistry {
    /// Registry containing only the built-in adapter table
    #[must_use]
    pub fn builtin() -> Self {
        let adapters = BUILTIN_PROGRAMS
            .iter()
            .map(|(name, paths)| {
                Adapter::new(*name, paths.iter().map(ToString::to_string).collect())
            })
            .collect();

        Self { adapters }
    }

    /// Build a registry from the user configuration
    ///
    /// The built-in table is included unless disabled by the
    /// configuration. Configured programs replace same-named built-ins;
    /// new programs are appended after them.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let mut registry = if config.use_builtins {
            Self::builtin()
        } else {
            Self {
                adapters: Vec::new(),
            }
        };

        for (name, paths) in &config.programs {
            match registry.adapters.iter_mut().find(|a| a.name() == name.as_str()) {
                Some(existing) => existing.paths = paths.clone(),
                None => registry.adapters.push(Adapter::new(name.clone(), paths.clone())),
            }
        }

        registry
    }

    /// Registered adapters in registration order
    #[must_use]
    pub fn adapters(&self) -> &[Adapter] {
        &self.adapters
    }

    /// Number of registered adapters
    #[must_use]
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Whether the registry has no adapters
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}
