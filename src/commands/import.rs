use std::path::{Path, PathBuf};

use dotkeep::archive;
use dotkeep::import::{Importer, ImportSource};

use crate::cli::PayloadFormat;
use crate::commands::common::{self, GlobalOptions};

pub struct Import;

impl Import {
    pub fn execute(
        input: Option<&Path>,
        format: PayloadFormat,
        dry_run: bool,
        tar: Option<Option<&Path>>,
        options: &GlobalOptions,
    ) -> anyhow::Result<()> {
        let source = resolve_source(input, tar);

        if options.verbose {
            eprintln!("Using {} importer", source.kind());
        }

        let importer = Importer::new(common::convert_format(format), source, dry_run);
        let result = importer.import()?;

        if options.verbose && !dry_run {
            eprintln!("Imported {} files", result.files_written);
        }

        Ok(())
    }
}

/// Pick the import source from the parsed flags
///
/// An archive request wins; its path is the value given to `--tar`, else
/// `--input`, else the default archive name. Without `--tar`, `--input`
/// wins and standard input is the fallback.
fn resolve_source(input: Option<&Path>, tar: Option<Option<&Path>>) -> ImportSource {
    match tar {
        Some(Some(path)) => ImportSource::Archive(path.to_path_buf()),
        Some(None) => ImportSource::Archive(
            input.map_or_else(
                || PathBuf::from(archive::DEFAULT_ARCHIVE_NAME),
                Path::to_path_buf,
            ),
        ),
        None => match input {
            Some(path) => ImportSource::File(path.to_path_buf()),
            None => ImportSource::Stdin,
        },
    }
}
