//! Re-encoding clipping implementation, used when stream copy is rejected

use crate::engine::{output_args, window_args, EngineConfig, ExtractionJob};

/// Re-encoding clipper
pub struct ReencodeClipper {
    /// Video codec (e.g. libx264)
    video_codec: String,
    /// Audio codec (e.g. aac)
    audio_codec: String,
    /// Encoding preset (ultrafast, fast, medium, slow, veryslow)
    preset: String,
}

impl ReencodeClipper {
    /// Create a re-encoding clipper with explicit codec parameters
    pub fn new(video_codec: &str, audio_codec: &str, preset: &str) -> Self {
        Self {
            video_codec: video_codec.to_string(),
            audio_codec: audio_codec.to_string(),
            preset: preset.to_string(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(&config.video_codec, &config.audio_codec, &config.preset)
    }

    /// Arguments that cut the same window and re-encode it
    pub fn args(&self, job: &ExtractionJob<'_>) -> Vec<String> {
        let mut args = window_args(job);
        args.extend([
            "-c:v".to_string(),
            self.video_codec.clone(),
            "-c:a".to_string(),
            self.audio_codec.clone(),
            "-preset".to_string(),
            self.preset.clone(),
        ]);
        args.extend(output_args(job));
        args
    }
}
