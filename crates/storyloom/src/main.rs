//! Storyloom CLI binary.
//!
//! This binary provides command-line access to the pipeline:
//! - Supervised full runs (lock, pipeline, sitemap, git sync)
//! - Standalone ingestion of the current trending batch
//! - Standalone sitemap republication

use clap::Parser;

mod cli;
mod lock;
mod supervisor;
mod sync;

use cli::{Cli, Commands};
use storyloom_core::RunConfig;
use tracing::error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    dotenvy::dotenv().ok();

    let config = match RunConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            std::process::exit(supervisor::EXIT_CONFIG);
        }
    };

    let code = match cli.command {
        Commands::Run => supervisor::run(&config).await,
        Commands::Ingest => supervisor::ingest(&config).await,
        Commands::Sitemap => supervisor::republish_sitemap(&config),
    };

    std::process::exit(code);
}
