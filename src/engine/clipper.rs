//! Clip extractor: runs the strategy chain for one clip request

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, warn};

use crate::app::cancel::CancelFlag;
use crate::domain::errors::DomainError;
use crate::domain::model::*;
use crate::engine::{build_args, EngineConfig, ExtractionJob};
use crate::output::OverwritePolicy;
use crate::ports::{FsPort, TranscodePort};

/// Extracts single clips through the external transcoder
pub struct ClipExtractor {
    transcoder: Arc<dyn TranscodePort>,
    fs: Arc<dyn FsPort>,
    config: EngineConfig,
}

impl ClipExtractor {
    /// Create a new clip extractor
    pub fn new(transcoder: Arc<dyn TranscodePort>, fs: Arc<dyn FsPort>, config: EngineConfig) -> Self {
        Self {
            transcoder,
            fs,
            config,
        }
    }

    /// Produce the outcome for one request.
    ///
    /// Every row-local failure ends up in the returned outcome. The only
    /// error is `ToolUnavailable`, which must stop the run. A cancelled run
    /// starts no fallback attempt after a failed one.
    pub async fn extract(
        &self,
        request: &ClipRequest,
        output_path: &Path,
        source: &ResolvedSource,
        cancel: &CancelFlag,
    ) -> Result<ClipOutcome, DomainError> {
        let started = Instant::now();
        let row = request.row_index;

        if let Some(note) = self.blocked_by_existing_output(output_path).await {
            warn!(row, output = %output_path.display(), "{}", note);
            return Ok(Self::outcome(request, output_path, ClipStatus::ExtractionFailed, None, Vec::new(), Some(note)));
        }

        let job = ExtractionJob {
            input_url: &source.stream_url,
            start_seconds: request.start_seconds(),
            duration: self.config.clip_duration,
            output_path,
            overwrite: self.config.overwrite,
        };

        let mut attempts: Vec<AttemptRecord> = Vec::with_capacity(self.config.strategies.len());
        for strategy in self.config.strategies.iter() {
            if !attempts.is_empty() {
                if cancel.is_cancelled() {
                    warn!(row, %strategy, "Run cancelled, skipping fallback attempt");
                    self.discard_partial_output(row, output_path).await;
                    let note = DomainError::ExtractionFailed(format!(
                        "run cancelled before the {} attempt",
                        strategy
                    ))
                    .to_string();
                    return Ok(Self::outcome(request, output_path, ClipStatus::ExtractionFailed, None, attempts, Some(note)));
                }
                // Partial output from the failed attempt; `-n` would refuse it
                self.discard_partial_output(row, output_path).await;
            }

            info!(
                row,
                label = %request.label,
                start = request.start_seconds(),
                duration = self.config.clip_duration,
                %strategy,
                "Extracting clip"
            );

            let run = self
                .transcoder
                .run(&build_args(strategy, &job, &self.config))
                .await?;

            attempts.push(AttemptRecord {
                strategy,
                success: run.success,
                exit_code: run.exit_code,
                diagnostics: run.diagnostics.clone(),
            });

            if run.success {
                info!(
                    row,
                    output = %output_path.display(),
                    %strategy,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Clip created"
                );
                return Ok(Self::outcome(request, output_path, ClipStatus::Success, Some(strategy), attempts, None));
            }

            warn!(
                row,
                %strategy,
                exit_code = ?run.exit_code,
                diagnostics = %run.diagnostics,
                "Extraction attempt failed"
            );
        }

        error!(
            row,
            timestamp = %request.raw_timestamp,
            attempts = attempts.len(),
            "All extraction strategies failed"
        );
        self.discard_partial_output(row, output_path).await;

        let note = attempts.last().map(|attempt| {
            DomainError::ExtractionFailed(format!(
                "last attempt ({}) exited with {:?}",
                attempt.strategy, attempt.exit_code
            ))
            .to_string()
        });
        Ok(Self::outcome(request, output_path, ClipStatus::ExtractionFailed, None, attempts, note))
    }

    async fn discard_partial_output(&self, row: usize, output_path: &Path) {
        if let Err(e) = self.fs.remove_file(output_path).await {
            warn!(row, output = %output_path.display(), error = %e, "Could not remove partial output");
        }
    }

    /// Reason the row must not run under `OverwritePolicy::Never`, if any
    async fn blocked_by_existing_output(&self, output_path: &Path) -> Option<String> {
        if self.config.overwrite != OverwritePolicy::Never {
            return None;
        }
        match self.fs.file_exists(output_path).await {
            Ok(false) => None,
            Ok(true) => Some(
                DomainError::ExtractionFailed(format!(
                    "output {} already exists and overwrite is disabled",
                    output_path.display()
                ))
                .to_string(),
            ),
            Err(e) => Some(e.to_string()),
        }
    }

    fn outcome(
        request: &ClipRequest,
        output_path: &Path,
        status: ClipStatus,
        strategy_used: Option<ExtractionStrategy>,
        attempts: Vec<AttemptRecord>,
        note: Option<String>,
    ) -> ClipOutcome {
        ClipOutcome {
            request: request.clone(),
            output_path: output_path.to_path_buf(),
            status,
            strategy_used,
            attempts,
            note,
        }
    }
}
