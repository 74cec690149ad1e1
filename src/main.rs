mod cli;
mod commands;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use commands::GlobalOptions;

fn main() -> anyhow::Result<()> {
    // Set up Ctrl+C handler for graceful interruption
    ctrlc::set_handler(|| {
        eprintln!("\nInterrupted by user (Ctrl+C)");
        std::process::exit(130); // Standard exit code for SIGINT
    })
    .context("Failed to set Ctrl+C handler")?;

    let cli = Cli::parse();

    if cli.verbose {
        eprintln!("Verbose mode enabled");
    }

    let options = GlobalOptions::new(cli.verbose, cli.config.clone(), cli.no_config);

    match &cli.command {
        Commands::Export {
            output,
            format,
            dry_run,
            tar,
        } => {
            commands::Export::execute(
                output.as_deref(),
                *format,
                *dry_run,
                tar.as_ref().map(Option::as_deref),
                &options,
            )
            .context("Failed to execute export command")?;
        }
        Commands::Import {
            input,
            format,
            dry_run,
            tar,
        } => {
            commands::Import::execute(
                input.as_deref(),
                *format,
                *dry_run,
                tar.as_ref().map(Option::as_deref),
                &options,
            )
            .context("Failed to execute import command")?;
        }
    }

    Ok(())
}
