//! Episode Organizer CLI
//!
//! A command-line tool for assembling scattered series releases into a
//! clean, player-ready library using FFmpeg and MKVToolNix.

use clap::Parser;
use episode_organizer::cli::{
    args::{Cli, Commands},
    commands::{organize, validate},
};
use episode_organizer::models::config;
use episode_organizer::preflight;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    let config = config::load_config();

    // Run the appropriate command
    match cli.command {
        Commands::Organize {
            sources,
            yes,
            delete_source,
        } => {
            // Run preflight checks unless skipped
            if !cli.skip_preflight {
                run_preflight_checks()?;
            }

            organize::organize(&sources, yes, delete_source, &config).await?;
        }

        Commands::Validate { path } => {
            validate::validate(&path, &config)?;
        }
    }

    Ok(())
}

/// Initialize the logging system.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("episode_organizer=debug")
    } else {
        EnvFilter::new("episode_organizer=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}

/// Run preflight checks and exit if any fail.
fn run_preflight_checks() -> anyhow::Result<()> {
    use colored::Colorize;

    println!("{}", "Running preflight checks...".bold());
    println!();

    let results = preflight::run_preflight_checks()?;
    preflight::print_results(&results);

    println!();

    if !preflight::all_passed(&results) {
        anyhow::bail!("Preflight checks failed. Fix the issues above and try again.");
    }

    Ok(())
}
