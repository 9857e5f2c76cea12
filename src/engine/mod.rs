//! Clip extraction engine
//!
//! The extractor walks a [`StrategyChain`] for each clip request, building
//! transcoder arguments per strategy and stopping at the first success.

use std::path::Path;

use crate::domain::model::ExtractionStrategy;
use crate::domain::rules::StrategyChain;
use crate::output::OverwritePolicy;

pub mod clipper;
pub mod copy;
pub mod reencode;

pub use clipper::ClipExtractor;
pub use copy::StreamCopyClipper;
pub use reencode::ReencodeClipper;

/// Clipping engine configuration, fixed for a run
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Length of every clip, in seconds
    pub clip_duration: u32,
    /// Video codec for re-encoding
    pub video_codec: String,
    /// Audio codec for re-encoding
    pub audio_codec: String,
    /// Encoding preset for re-encoding
    pub preset: String,
    /// Existing output handling
    pub overwrite: OverwritePolicy,
    /// Strategies tried in order
    pub strategies: StrategyChain,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            clip_duration: 10,
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            preset: "fast".to_string(),
            overwrite: OverwritePolicy::Always,
            strategies: StrategyChain::default(),
        }
    }
}

/// One transcoder invocation's inputs
#[derive(Debug, Clone, Copy)]
pub struct ExtractionJob<'a> {
    pub input_url: &'a str,
    pub start_seconds: u64,
    pub duration: u32,
    pub output_path: &'a Path,
    pub overwrite: OverwritePolicy,
}

/// Build the transcoder arguments for `strategy`
pub fn build_args(
    strategy: ExtractionStrategy,
    job: &ExtractionJob<'_>,
    config: &EngineConfig,
) -> Vec<String> {
    match strategy {
        ExtractionStrategy::StreamCopy => StreamCopyClipper::args(job),
        ExtractionStrategy::ReEncode => ReencodeClipper::from_config(config).args(job),
    }
}

/// Seek/duration/input prefix shared by every strategy
pub(crate) fn window_args(job: &ExtractionJob<'_>) -> Vec<String> {
    vec![
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-ss".to_string(),
        job.start_seconds.to_string(),
        "-i".to_string(),
        job.input_url.to_string(),
        "-t".to_string(),
        job.duration.to_string(),
    ]
}

/// Overwrite flag and output path suffix shared by every strategy
pub(crate) fn output_args(job: &ExtractionJob<'_>) -> Vec<String> {
    vec![
        job.overwrite.ffmpeg_flag().to_string(),
        job.output_path.to_string_lossy().to_string(),
    ]
}
