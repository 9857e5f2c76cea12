//! Run report rendering and output policy

use serde::{Deserialize, Serialize};

pub mod writer;

pub use writer::ReportWriter;

/// What to do when a clip's output file already exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OverwritePolicy {
    /// Replace the existing file
    #[default]
    Always,
    /// Leave the existing file alone and fail the row
    Never,
}

impl OverwritePolicy {
    /// Transcoder flag matching this policy
    pub fn ffmpeg_flag(&self) -> &'static str {
        match self {
            OverwritePolicy::Always => "-y",
            OverwritePolicy::Never => "-n",
        }
    }
}

/// Report rendering format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    /// Human-readable table
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}
