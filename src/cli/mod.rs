//! CLI module for clipper
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::utils::logging::{LogFormat, LOG_LEVELS};

pub mod args;
pub mod commands;

pub use args::{CheckArgs, ConfigOverrides, PlanArgs, RunArgs};

/// Batch video clipper
///
/// Cuts fixed-length clips out of one source video at the timestamps listed
/// in a CSV manifest, using yt-dlp to resolve the stream and ffmpeg to cut.
#[derive(Parser, Debug)]
#[command(name = "clipper")]
#[command(about = "Cut a batch of clips from one video at manifest timestamps")]
#[command(version)]
pub struct Cli {
    /// Logging level
    #[arg(long, default_value = "info", global = true, env = "CLIPPER_LOG_LEVEL", value_parser = LOG_LEVELS)]
    pub log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    /// Config file (default: ./clipper.toml when present)
    #[arg(long, global = true, env = "CLIPPER_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the source and extract every clip in the manifest
    Run(RunArgs),
    /// Show what a run would extract, without calling any tool
    Plan(PlanArgs),
    /// Verify the resolver and transcoder can be launched
    Check(CheckArgs),
}
