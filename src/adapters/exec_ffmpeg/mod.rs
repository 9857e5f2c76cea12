//! FFmpeg execution adapter
//!
//! Runs the system `ffmpeg` binary. Argument lists are built by the engine;
//! this adapter only launches the process and reports how it exited.

use async_trait::async_trait;

use crate::adapters::process::{probe_version, run_captured};
use crate::domain::errors::*;
use crate::ports::*;

/// FFmpeg-based execution adapter
pub struct FFmpegAdapter {
    program: String,
}

impl FFmpegAdapter {
    /// Create new FFmpeg adapter running `program`
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl TranscodePort for FFmpegAdapter {
    async fn run(&self, args: &[String]) -> Result<ToolRun, DomainError> {
        let output = run_captured(&self.program, args).await?;
        Ok(ToolRun {
            success: output.status.success(),
            exit_code: output.status.code(),
            diagnostics: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }

    fn tool_name(&self) -> &str {
        &self.program
    }

    async fn probe_tool(&self) -> Result<String, DomainError> {
        probe_version(&self.program, "-version").await
    }
}
