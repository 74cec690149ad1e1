use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Configuration file exporter
///
/// Detects configuration files from common programs, such as vim or zsh,
/// and serializes them so they can be restored later
#[derive(Parser, Debug)]
#[command(name = "dotkeep")]
#[command(about, long_about = None, version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use specific config file
    #[arg(long, global = true, value_name = "PATH", conflicts_with = "no_config")]
    pub config: Option<PathBuf>,

    /// Ignore all config files
    #[arg(long, global = true, conflicts_with = "config")]
    pub no_config: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export configurations to be imported in the future
    ///
    /// Writes the encoded payload to standard output by default.
    Export {
        /// File to export configurations to
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// File format to export/import
        #[arg(short, long, value_enum, default_value = "json")]
        format: PayloadFormat,

        /// Print all files recognized without exporting them
        #[arg(long, conflicts_with = "tar")]
        dry_run: bool,

        /// Export a compressed tarball instead of a payload
        #[arg(short, long, value_name = "ARCHIVE", num_args = 0..=1)]
        tar: Option<Option<PathBuf>>,
    },

    /// Import configurations that were previously exported
    ///
    /// Reads the encoded payload from standard input by default.
    Import {
        /// File to import configurations from
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// File format to export/import
        #[arg(short, long, value_enum, default_value = "json")]
        format: PayloadFormat,

        /// Print all target files without writing them
        #[arg(long, conflicts_with = "tar")]
        dry_run: bool,

        /// Import from a compressed tarball instead of a payload
        #[arg(short, long, value_name = "ARCHIVE", num_args = 0..=1)]
        tar: Option<Option<PathBuf>>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PayloadFormat {
    /// Human-readable JSON payload
    Json,
    /// Compact binary payload
    Binary,
}
