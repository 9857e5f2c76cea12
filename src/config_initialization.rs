//! Configuration initialization and hierarchy management

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::adapters::toml_config::{ClipperConfig, TomlConfigAdapter, DEFAULT_CONFIG_FILE};
use crate::cli::ConfigOverrides;

/// Build the run configuration following precedence: CLI > Env > File > Defaults.
///
/// Env and CLI are both carried by `overrides` (clap reads the `CLIPPER_*`
/// variables when a flag is absent).
pub fn initialize_configuration_hierarchy(
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<ClipperConfig> {
    let mut config = load_config_file(config_path)?;
    let applied = apply_overrides(&mut config, overrides);
    if applied > 0 {
        debug!(applied, "Applied configuration overrides");
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Load configuration from file, or defaults when no file applies.
///
/// An explicitly named file must exist; the default file is optional.
fn load_config_file(config_path: Option<&Path>) -> Result<ClipperConfig> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default.exists() {
                debug!("No config file found, using defaults");
                return Ok(ClipperConfig::default());
            }
            default
        }
    };

    info!(path = %path.display(), "Loading configuration");
    TomlConfigAdapter::load(&path)
        .with_context(|| format!("Failed to load config file {}", path.display()))
}

/// Apply CLI/env overrides, returning how many were set
fn apply_overrides(config: &mut ClipperConfig, overrides: &ConfigOverrides) -> usize {
    let mut applied = 0;

    if let Some(dir) = &overrides.output_dir {
        config.output_dir = dir.clone();
        applied += 1;
    }
    if let Some(duration) = overrides.duration {
        config.clip_duration = duration;
        applied += 1;
    }
    if let Some(workers) = overrides.workers {
        config.workers = workers;
        applied += 1;
    }
    if let Some(overwrite) = overrides.overwrite {
        config.overwrite = overwrite;
        applied += 1;
    }
    if let Some(container) = &overrides.container {
        config.container_extension = container.clone();
        applied += 1;
    }
    if let Some(resolver) = &overrides.resolver {
        config.resolver.program = resolver.clone();
        applied += 1;
    }
    if let Some(transcoder) = &overrides.transcoder {
        config.transcoder.program = transcoder.clone();
        applied += 1;
    }

    applied
}
