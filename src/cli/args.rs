//! Command line argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Episode Organizer - assemble series episodes into a Plex-ready library
#[derive(Parser, Debug)]
#[command(name = "episode-organizer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip preflight checks
    #[arg(long, global = true)]
    pub skip_preflight: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Organize one or more source directories
    Organize {
        /// Source directories, comma-separated
        #[arg(value_name = "SOURCES")]
        sources: String,

        /// Skip interactive confirmation prompts
        #[arg(short, long)]
        yes: bool,

        /// Delete a source directory after a fully successful run
        #[arg(long)]
        delete_source: bool,
    },

    /// Validate produced output files in a directory
    Validate {
        /// Directory containing MKV files to validate
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
}
