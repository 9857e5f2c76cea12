// TOML config adapter - Run configuration from TOML files

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::errors::*;
use crate::domain::rules::StrategyChain;
use crate::engine::EngineConfig;
use crate::output::OverwritePolicy;
use crate::utils::path::PathUtils;

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "clipper.toml";

/// Resolver tool settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    pub program: String,
    /// Stream format preference passed to the resolver
    pub format: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            program: "yt-dlp".to_string(),
            format: "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best".to_string(),
        }
    }
}

/// Transcoder tool settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranscoderConfig {
    pub program: String,
    pub video_codec: String,
    pub audio_codec: String,
    pub preset: String,
}

impl Default for TranscoderConfig {
    fn default() -> Self {
        Self {
            program: "ffmpeg".to_string(),
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            preset: "fast".to_string(),
        }
    }
}

/// Complete run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClipperConfig {
    pub output_dir: PathBuf,
    /// Clip length in seconds
    pub clip_duration: u32,
    pub container_extension: String,
    pub overwrite: OverwritePolicy,
    /// Parallel extractions; 0 means one per CPU
    pub workers: usize,
    pub resolver: ResolverConfig,
    pub transcoder: TranscoderConfig,
}

impl Default for ClipperConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("clips"),
            clip_duration: 10,
            container_extension: "mp4".to_string(),
            overwrite: OverwritePolicy::Always,
            workers: 1,
            resolver: ResolverConfig::default(),
            transcoder: TranscoderConfig::default(),
        }
    }
}

impl ClipperConfig {
    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.clip_duration == 0 {
            return Err(DomainError::BadConfig(
                "clip_duration must be at least 1 second".to_string(),
            ));
        }

        let ext = self.container_extension.trim_start_matches('.');
        if ext.is_empty() || !PathUtils::is_safe_label(ext) {
            return Err(DomainError::BadConfig(format!(
                "container_extension '{}' is not a plain file extension",
                self.container_extension
            )));
        }

        if self.resolver.program.trim().is_empty() || self.transcoder.program.trim().is_empty() {
            return Err(DomainError::BadConfig(
                "tool program names cannot be empty".to_string(),
            ));
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(DomainError::BadConfig("output_dir cannot be empty".to_string()));
        }

        Ok(())
    }

    /// Worker count with 0 expanded to the CPU count
    pub fn effective_workers(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get().max(1)
        } else {
            self.workers
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            clip_duration: self.clip_duration,
            video_codec: self.transcoder.video_codec.clone(),
            audio_codec: self.transcoder.audio_codec.clone(),
            preset: self.transcoder.preset.clone(),
            overwrite: self.overwrite,
            strategies: StrategyChain::default(),
        }
    }
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn parse(toml_content: &str) -> Result<ClipperConfig, DomainError> {
        toml::from_str(toml_content)
            .map_err(|e| DomainError::BadConfig(format!("Failed to parse TOML config: {}", e)))
    }

    /// Load configuration from file
    pub fn load(file_path: &Path) -> Result<ClipperConfig, DomainError> {
        let content = std::fs::read_to_string(file_path).map_err(|e| {
            DomainError::FsFail(format!(
                "Failed to read config file {}: {}",
                file_path.display(),
                e
            ))
        })?;
        Self::parse(&content)
    }

    /// Serialize configuration, e.g. to show the effective settings
    pub fn to_toml(config: &ClipperConfig) -> Result<String, DomainError> {
        toml::to_string_pretty(config)
            .map_err(|e| DomainError::BadConfig(format!("Failed to serialize config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClipperConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("clips"));
        assert_eq!(config.clip_duration, 10);
        assert_eq!(config.overwrite, OverwritePolicy::Always);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = TomlConfigAdapter::parse(
            r#"
            clip_duration = 15
            overwrite = "never"

            [transcoder]
            preset = "veryfast"
            "#,
        )
        .unwrap();
        assert_eq!(config.clip_duration, 15);
        assert_eq!(config.overwrite, OverwritePolicy::Never);
        assert_eq!(config.transcoder.preset, "veryfast");
        assert_eq!(config.transcoder.program, "ffmpeg");
        assert_eq!(config.resolver.program, "yt-dlp");
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(matches!(
            TomlConfigAdapter::parse("clip_length = 3"),
            Err(DomainError::BadConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ClipperConfig::default();
        config.clip_duration = 0;
        assert!(config.validate().is_err());

        let mut config = ClipperConfig::default();
        config.container_extension = "mp4/../x".to_string();
        assert!(config.validate().is_err());

        let mut config = ClipperConfig::default();
        config.container_extension = ".mkv".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_effective_workers() {
        let mut config = ClipperConfig::default();
        assert_eq!(config.effective_workers(), 1);
        config.workers = 0;
        assert!(config.effective_workers() >= 1);
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = ClipperConfig::default();
        let text = TomlConfigAdapter::to_toml(&config).unwrap();
        assert_eq!(TomlConfigAdapter::parse(&text).unwrap(), config);
    }
}
