//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Lever extractor CLI
#[derive(Parser, Debug)]
#[command(name = "lever-extractor")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the extraction
    Run {
        /// Output directory for CSV tables and manifests
        #[arg(short, long, default_value = "out/tables")]
        output: PathBuf,
    },

    /// Validate the configuration without any network activity
    Validate,
}
