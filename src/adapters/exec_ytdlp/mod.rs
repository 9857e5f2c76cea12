//! yt-dlp resolution adapter
//!
//! Turns a page URL or video identifier into directly fetchable stream URLs
//! by running `yt-dlp -f <format> --get-url <reference>`.

use async_trait::async_trait;
use tracing::debug;

use crate::adapters::process::{probe_version, run_captured};
use crate::domain::errors::*;
use crate::ports::*;

/// yt-dlp based resolver
pub struct YtDlpAdapter {
    program: String,
}

impl YtDlpAdapter {
    /// Create new adapter running `program`
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn build_args(reference: &str, format: &str) -> Vec<String> {
        vec![
            "-f".to_string(),
            format.to_string(),
            "--get-url".to_string(),
            reference.to_string(),
        ]
    }

    /// One URL per non-blank stdout line, in order
    fn parse_urls(stdout: &str) -> Vec<String> {
        stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[async_trait]
impl ResolvePort for YtDlpAdapter {
    async fn resolve_stream_urls(
        &self,
        reference: &str,
        format: &str,
    ) -> Result<Vec<String>, DomainError> {
        let output = run_captured(&self.program, &Self::build_args(reference, format)).await?;
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            return Err(DomainError::ResolutionFailed(format!(
                "{} exited with {}: {}",
                self.program, output.status, stderr
            )));
        }

        let urls = Self::parse_urls(&String::from_utf8_lossy(&output.stdout));
        debug!(count = urls.len(), "Resolver returned URLs");
        if urls.is_empty() {
            return Err(DomainError::ResolutionFailed(format!(
                "{} printed no URL: {}",
                self.program, stderr
            )));
        }

        Ok(urls)
    }

    fn tool_name(&self) -> &str {
        &self.program
    }

    async fn probe_tool(&self) -> Result<String, DomainError> {
        probe_version(&self.program, "--version").await
    }
}
