//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;
use clap_num::number_range;

use crate::output::{OverwritePolicy, ReportFormat};

fn parse_duration(s: &str) -> Result<u32, String> {
    number_range(s, 1, 86_400)
}

fn parse_workers(s: &str) -> Result<usize, String> {
    number_range(s, 0, 256)
}

/// Settings that override the config file; each also reads a `CLIPPER_*` variable
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Directory clips are written to
    #[arg(long, env = "CLIPPER_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Clip length in seconds
    #[arg(short, long, env = "CLIPPER_CLIP_DURATION", value_parser = parse_duration)]
    pub duration: Option<u32>,

    /// Parallel extractions (0 = one per CPU)
    #[arg(short, long, env = "CLIPPER_WORKERS", value_parser = parse_workers)]
    pub workers: Option<usize>,

    /// What to do when an output file already exists
    #[arg(long, value_enum, env = "CLIPPER_OVERWRITE")]
    pub overwrite: Option<OverwritePolicy>,

    /// Output container extension
    #[arg(long, env = "CLIPPER_CONTAINER")]
    pub container: Option<String>,

    /// URL resolution program
    #[arg(long, env = "CLIPPER_RESOLVER")]
    pub resolver: Option<String>,

    /// Transcoding program
    #[arg(long, env = "CLIPPER_TRANSCODER")]
    pub transcoder: Option<String>,
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Source video URL or identifier
    #[arg(short, long)]
    pub source: String,

    /// Timestamp manifest (CSV with a Timestamp column)
    #[arg(short, long)]
    pub manifest: PathBuf,

    #[command(flatten)]
    pub overrides: ConfigOverrides,

    /// Exit non-zero if any row was skipped or failed
    #[arg(long)]
    pub strict: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Timestamp manifest (CSV with a Timestamp column)
    #[arg(short, long)]
    pub manifest: PathBuf,

    #[command(flatten)]
    pub overrides: ConfigOverrides,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub overrides: ConfigOverrides,

    /// Also print the effective configuration
    #[arg(long)]
    pub show_config: bool,
}
