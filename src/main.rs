//! Clipper Batch CLI
//!
//! Cuts a batch of fixed-length clips out of one video, at the timestamps
//! listed in a CSV manifest, with lossless stream-copy and a re-encode
//! fallback per clip.
//!
//! # Features
//!
//! - Source resolution through yt-dlp, falling back to the raw reference
//! - Per-row skips for missing or malformed timestamps
//! - Unique, filesystem-safe output names
//! - Optional parallel extraction
//!
//! # Usage
//!
//! ```bash
//! clipper run --source "https://youtu.be/abc" --manifest timestamps.csv
//! clipper plan --manifest timestamps.csv --output-dir clips
//! clipper check --show-config
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use clipper_batch::cli::{commands, Cli, Commands};
use clipper_batch::utils::logging::init_logging;

/// Main entry point for the clipper CLI
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_format)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting clipper");
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Run(args) => commands::run(args, config_path).await,
        Commands::Plan(args) => commands::plan(args, config_path).await,
        Commands::Check(args) => commands::check(args, config_path).await,
    }
}
