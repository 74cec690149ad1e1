use std::path::PathBuf;

use dotkeep::adapters::AdapterRegistry;
use dotkeep::config::Config;
use dotkeep::formats::Format;

use crate::cli::PayloadFormat;

/// Global CLI flags shared by every command
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub verbose: bool,
    pub config: Option<PathBuf>,
    pub no_config: bool,
}

impl GlobalOptions {
    pub const fn new(verbose: bool, config: Option<PathBuf>, no_config: bool) -> Self {
        Self {
            verbose,
            config,
            no_config,
        }
    }
}

/// Build the adapter registry from the built-in table and the user config
pub fn build_registry(options: &GlobalOptions) -> anyhow::Result<AdapterRegistry> {
    let config = if options.no_config {
        Config::default()
    } else {
        Config::load(options.config.as_deref())?
    };

    let registry = AdapterRegistry::from_config(&config);

    if options.verbose {
        eprintln!("Registered {} adapters", registry.len());
    }

    Ok(registry)
}

pub const fn convert_format(format: PayloadFormat) -> Format {
    match format {
        PayloadFormat::Json => Format::Json,
        PayloadFormat::Binary => Format::Binary,
    }
}
