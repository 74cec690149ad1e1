//! Export pipeline and destinations
//!
//! Exporting walks the adapter registry, aggregates the configuration
//! files that exist on disk into a [`ConfigSet`], and hands the encoded
//! payload to the selected destination. Archive mode bypasses the
//! serialized payload entirely and packages the raw files instead.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;

use crate::adapters::AdapterRegistry;
use crate::archive;
use crate::error::Result;
use crate::formats::{ConfigSet, Format};
use crate::paths;

/// Destination for an export operation, selected from the parsed flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTarget {
    /// Write the encoded payload to standard output
    Stdout,
    /// Write the encoded payload to a file, overwriting it
    File(PathBuf),
    /// List the paths that would be exported without writing anything
    DryRun,
    /// Package the raw files into a gzip tar archive
    Archive(PathBuf),
}

impl ExportTarget {
    /// Short human-readable name of the destination variant
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Stdout => "standard output",
            Self::File(_) => "file",
            Self::DryRun => "dry run",
            Self::Archive(_) => "archive",
        }
    }
}

/// Runs a single export operation against a registry
#[derive(Debug)]
pub struct Exporter {
    format: Format,
    target: ExportTarget,
}

impl Exporter {
    /// Create an exporter for the given format and destination
    #[must_use]
    pub const fn new(format: Format, target: ExportTarget) -> Self {
        Self { format, target }
    }

    /// Execute the export
    ///
    /// # Errors
    ///
    /// Returns an error if any existing file cannot be read or the
    /// destination cannot be written.
    pub fn export(&self, registry: &AdapterRegistry) -> Result<()> {
        match &self.target {
            ExportTarget::Stdout => {
                let payload = self.encode(registry)?;
                io::stdout()
                    .write_all(&payload)
                    .context("Failed to write payload to standard output")?;
            }
            ExportTarget::File(path) => {
                let payload = self.encode(registry)?;
                let path = paths::expand_home_path(path)?;
                fs::write(&path, payload)
                    .with_context(|| format!("Failed to write payload to {}", path.display()))?;
            }
            ExportTarget::DryRun => {
                for adapter in registry.adapters() {
                    for (path, _) in adapter.read_existing_files()? {
                        println!("{path}");
                    }
                }
            }
            ExportTarget::Archive(path) => {
                archive::pack(registry, path)?;
            }
        }

        Ok(())
    }

    fn encode(&self, registry: &AdapterRegistry) -> Result<Vec<u8>> {
        let set = collect(registry)?;
        let payload = self
            .format
            .encode(&set)
            .context("Failed to encode payload")?;

        Ok(payload)
    }
}

/// Aggregate the existing configuration files of every registered program
///
/// Programs whose declared files are all missing are omitted entirely.
///
/// # Errors
///
/// Returns an error if a file exists but cannot be read.
pub fn collect(registry: &AdapterRegistry) -> Result<ConfigSet> {
    let mut set = ConfigSet::new();

    for adapter in registry.adapters() {
        let files = adapter.read_existing_files()?;
        if files.is_empty() {
            continue;
        }

        set.insert(adapter.name().to_string(), files.into_iter().collect());
    }

    Ok(set)
}
