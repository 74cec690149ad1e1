use std::path::{Path, PathBuf};

use dotkeep::archive;
use dotkeep::export::{Exporter, ExportTarget};

use crate::cli::PayloadFormat;
use crate::commands::common::{self, GlobalOptions};

pub struct Export;

impl Export {
    pub fn execute(
        output: Option<&Path>,
        format: PayloadFormat,
        dry_run: bool,
        tar: Option<Option<&Path>>,
        options: &GlobalOptions,
    ) -> anyhow::Result<()> {
        let registry = common::build_registry(options)?;
        let target = resolve_target(output, dry_run, tar);

        if options.verbose {
            eprintln!("Using {} exporter", target.kind());
        }

        let exporter = Exporter::new(common::convert_format(format), target);
        exporter.export(&registry)?;

        Ok(())
    }
}

/// Pick the export destination from the parsed flags
///
/// An archive request wins over everything; its path is the value given
/// to `--tar`, else `--output`, else the default archive name. Without
/// `--tar`, `--output` wins over `--dry-run`, and standard output is the
/// fallback.
fn resolve_target(
    output: Option<&Path>,
    dry_run: bool,
    tar: Option<Option<&Path>>,
) -> ExportTarget {
    match tar {
        Some(Some(path)) => ExportTarget::Archive(path.to_path_buf()),
        Some(None) => ExportTarget::Archive(
            output.map_or_else(
                || PathBuf::from(archive::DEFAULT_ARCHIVE_NAME),
                Path::to_path_buf,
            ),
        ),
        None => {
            if let Some(path) = output {
                ExportTarget::File(path.to_path_buf())
            } else if dry_run {
                ExportTarget::DryRun
            } else {
                ExportTarget::Stdout
            }
        }
    }
}
