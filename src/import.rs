//! Import pipeline and sources
//!
//! Importing reads a previously exported payload, decodes it, and writes
//! every file back to its original location, overwriting whatever is
//! there. There are no retries and no rollback: the first error aborts
//! the operation, leaving already-written files in place.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::Context;

use crate::archive;
use crate::error::Result;
use crate::formats::Format;
use crate::paths;

/// Source of an import operation, selected from the parsed flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSource {
    /// Read the encoded payload from standard input
    Stdin,
    /// Read the encoded payload from a file
    File(PathBuf),
    /// Restore raw files from a gzip tar archive
    Archive(PathBuf),
}

impl ImportSource {
    /// Short human-readable name of the source variant
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Stdin => "standard input",
            Self::File(_) => "file",
            Self::Archive(_) => "archive",
        }
    }
}

/// Outcome of an import operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportResult {
    /// Number of files written to their original locations
    pub files_written: usize,
}

/// Runs a single import operation
#[derive(Debug)]
pub struct Importer {
    format: Format,
    source: ImportSource,
    dry_run: bool,
}

impl Importer {
    /// Create an importer for the given format and source
    ///
    /// With `dry_run` set, target paths are printed instead of written.
    #[must_use]
    pub const fn new(format: Format, source: ImportSource, dry_run: bool) -> Self {
        Self {
            format,
            source,
            dry_run,
        }
    }

    /// Execute the import
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be read or decoded, or if
    /// any destination cannot be written.
    pub fn import(&self) -> Result<ImportResult> {
        match &self.source {
            ImportSource::Archive(path) => {
                archive::restore(path)?;
                Ok(ImportResult::default())
            }
            ImportSource::Stdin => {
                let mut payload = Vec::new();
                io::stdin()
                    .read_to_end(&mut payload)
                    .context("Failed to read payload from standard input")?;
                self.apply(&payload)
            }
            ImportSource::File(path) => {
                let path = paths::expand_home_path(path)?;
                let payload = fs::read(&path)
                    .with_context(|| format!("Failed to read payload from {}", path.display()))?;
                self.apply(&payload)
            }
        }
    }

    fn apply(&self, payload: &[u8]) -> Result<ImportResult> {
        let set = self
            .format
            .decode(payload)
            .context("Failed to decode payload")?;

        let mut result = ImportResult::default();

        for files in set.values() {
            for (path, content) in files {
                if self.dry_run {
                    println!("{path}");
                } else {
                    write_file(path, content)?;
                    result.files_written += 1;
                }
            }
        }

        Ok(result)
    }
}

fn write_file(path: &str, content: &str) -> Result<()> {
    let dest = paths::expand_home(path)?;

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    fs::write(&dest, content).with_context(|| format!("Failed to write {}", dest.display()))
}
