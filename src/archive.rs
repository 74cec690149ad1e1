//! Compressed archive packaging with a path-mapping manifest
//!
//! Archive mode packages the raw configuration files (not their
//! serialized contents) into a gzip-compressed tar. Files are staged
//! under one directory per program, flattened to their base names, and a
//! `metadata.json` manifest records how each archived path maps back to
//! its original declared path so the transformation can be reversed on
//! restore.
//!
//! Unlike text export, archive export assumes every declared file exists
//! and fails hard when one is missing.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::mem;
use std::path::{Path, PathBuf};

use anyhow::Context;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

use crate::adapters::AdapterRegistry;
use crate::error::Result;
use crate::paths;

/// Archive name used when no explicit path is given
pub const DEFAULT_ARCHIVE_NAME: &str = "dotkeep-export.tar.gz";

/// Fixed manifest file name inside the archive's top-level directory
const MANIFEST_NAME: &str = "metadata.json";

/// Mapping from an archived file back to its original location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Path of the copy inside the archive (`<program>/<basename>`)
    pub archived_path: String,
    /// Declared path the file came from, possibly using `~/` shorthand
    pub original_path: String,
}

/// Package every declared configuration file into a gzip tar archive
///
/// Files are staged in a temporary directory that is removed on success
/// and failure alike.
///
/// # Errors
///
/// Returns an error if any declared file is missing or unreadable, or if
/// the archive cannot be written.
pub fn pack(registry: &AdapterRegistry, output: &Path) -> Result<()> {
    let output = paths::expand_home_path(output)?;

    let staging = TempDir::new().context("Failed to create staging directory")?;
    let manifest = stage_files(registry, staging.path())?;
    write_manifest(staging.path(), &manifest)?;
    write_archive(staging.path(), &output)?;

    staging
        .close()
        .context("Failed to remove staging directory")?;

    Ok(())
}

/// Restore configuration files from a gzip tar archive
///
/// The archive is extracted into the current working directory, the
/// manifest applied, and the extracted tree removed afterwards.
///
/// # Errors
///
/// Returns an error if the archive cannot be read, carries no manifest,
/// or a file cannot be copied back to its original location.
pub fn restore(input: &Path) -> Result<()> {
    let workdir = std::env::current_dir().context("Failed to get current directory")?;
    restore_in(input, &workdir)
}

fn restore_in(input: &Path, workdir: &Path) -> Result<()> {
    let input = paths::expand_home_path(input)?;

    let root_name = read_root_name(&input)?;
    unpack(&input, workdir)?;

    let extracted = ExtractedDir::new(workdir.join(&root_name));
    let manifest = read_manifest(extracted.path())?;
    restore_files(extracted.path(), &manifest)?;

    extracted.close()
}

fn stage_files(registry: &AdapterRegistry, staging: &Path) -> Result<Vec<ManifestEntry>> {
    let mut manifest = Vec::new();

    for adapter in registry.adapters() {
        let program_dir = staging.join(adapter.name());
        fs::create_dir(&program_dir)
            .with_context(|| format!("Failed to create staging directory for {}", adapter.name()))?;

        for declared in adapter.declared_paths() {
            let source = paths::expand_home(declared)?;
            let base_name = source
                .file_name()
                .with_context(|| format!("Declared path has no file name: {declared}"))?
                .to_string_lossy()
                .into_owned();

            copy_file(&source, &program_dir.join(&base_name))
                .with_context(|| format!("Failed to copy {}", source.display()))?;

            manifest.push(ManifestEntry {
                archived_path: format!("{}/{}", adapter.name(), base_name),
                original_path: declared.clone(),
            });
        }
    }

    Ok(manifest)
}

fn write_manifest(staging: &Path, entries: &[ManifestEntry]) -> Result<()> {
    let json = serde_json::to_string_pretty(entries)
        .context("Failed to serialize archive manifest")?;

    fs::write(staging.join(MANIFEST_NAME), json).context("Failed to write archive manifest")
}

fn write_archive(staging: &Path, output: &Path) -> Result<()> {
    let file = File::create(output)
        .with_context(|| format!("Failed to create archive {}", output.display()))?;

    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);

    builder
        .append_dir_all(archive_root_name(output), staging)
        .context("Failed to add files to archive")?;

    let encoder = builder
        .into_inner()
        .context("Failed to finish archive")?;
    encoder.finish().context("Failed to finish compression")?;

    Ok(())
}

/// Top-level directory name inside the archive: the output file name up
/// to its first `.`
fn archive_root_name(output: &Path) -> String {
    let name = output
        .file_name()
        .map_or_else(|| "export".to_string(), |n| n.to_string_lossy().into_owned());

    match name.split('.').next() {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => name,
    }
}

/// Read the top-level directory name from the archive's first entry
fn read_root_name(input: &Path) -> Result<String> {
    let file = File::open(input)
        .with_context(|| format!("Failed to open archive {}", input.display()))?;

    let mut archive = tar::Archive::new(GzDecoder::new(BufReader::new(file)));
    let mut entries = archive.entries().context("Failed to read archive")?;

    let entry = entries
        .next()
        .context("Archive is empty")?
        .context("Failed to read archive entry")?;
    let path = entry.path().context("Failed to read archive entry path")?;
    let root = path
        .components()
        .next()
        .context("Archive entry has an empty path")?;

    Ok(root.as_os_str().to_string_lossy().into_owned())
}

fn unpack(input: &Path, workdir: &Path) -> Result<()> {
    let file = File::open(input)
        .with_context(|| format!("Failed to open archive {}", input.display()))?;

    let mut archive = tar::Archive::new(GzDecoder::new(BufReader::new(file)));
    archive
        .unpack(workdir)
        .with_context(|| format!("Failed to extract archive {}", input.display()))
}

fn read_manifest(extracted: &Path) -> Result<Vec<ManifestEntry>> {
    let path = extracted.join(MANIFEST_NAME);
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read archive manifest {}", path.display()))?;

    serde_json::from_str(&content).context("Failed to parse archive manifest")
}

fn restore_files(extracted: &Path, manifest: &[ManifestEntry]) -> Result<()> {
    for entry in manifest {
        let source = extracted.join(&entry.archived_path);
        let dest = paths::expand_home(&entry.original_path)?;

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        copy_file(&source, &dest).with_context(|| {
            format!(
                "Failed to restore {} to {}",
                entry.archived_path,
                dest.display()
            )
        })?;
    }

    Ok(())
}

/// Copy a file, carrying over its modification time where the platform
/// allows it
fn copy_file(source: &Path, dest: &Path) -> io::Result<()> {
    fs::copy(source, dest)?;

    if let Ok(modified) = fs::metadata(source).and_then(|m| m.modified()) {
        let _ = File::options()
            .write(true)
            .open(dest)
            .and_then(|f| f.set_modified(modified));
    }

    Ok(())
}

/// Extracted archive directory, removed when the restore finishes or
/// fails partway
struct ExtractedDir {
    path: PathBuf,
}

impl ExtractedDir {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn close(self) -> Result<()> {
        let path = self.path.clone();
        mem::forget(self);

        fs::remove_dir_all(&path)
            .with_context(|| format!("Failed to remove extracted directory {}", path.display()))
    }
}

impl Drop for ExtractedDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}
