//! Command-line interface definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Scheduled trending-topic story pipeline.
#[derive(Debug, Parser)]
#[command(name = "storyloom", version, about)]
pub struct Cli {
    /// Path to the run configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Full supervised run: lock, ingest, generate, sitemap, git sync
    Run,
    /// Fetch the current trending batch and store it, nothing else
    Ingest,
    /// Rebuild the sitemap from the store and the published document
    Sitemap,
}
