// Batch interactor - Orchestrates a whole clipping run

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::app::cancel::CancelFlag;
use crate::app::source_resolver::SourceResolver;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::OutputNamer;
use crate::engine::ClipExtractor;
use crate::manifest::{Manifest, ManifestReader};
use crate::ports::FsPort;

/// Where the manifest comes from
#[derive(Debug, Clone)]
pub enum ManifestSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// Run-wide settings for the orchestrator
#[derive(Debug, Clone)]
pub struct BatchSettings {
    pub output_dir: PathBuf,
    pub container_extension: String,
    /// Concurrent extractions; 1 processes rows strictly one after another
    pub workers: usize,
}

/// Result of one state: either the next state's input, or a finished run
enum Step<T> {
    Next(RunReport, T),
    Finished(RunReport),
}

/// Interactor for the batch clipping use case.
///
/// Drives `Idle → ResolvingSource → ReadingManifest → ExtractingClips → Done`,
/// ending in `AbortedMissingTool` when a required tool cannot be launched.
/// Each state takes the run report by value and hands it to the next.
pub struct BatchInteractor {
    resolver: SourceResolver,
    extractor: Arc<ClipExtractor>,
    fs: Arc<dyn FsPort>,
    settings: BatchSettings,
}

impl BatchInteractor {
    /// Create new batch interactor with injected collaborators
    pub fn new(
        resolver: SourceResolver,
        extractor: Arc<ClipExtractor>,
        fs: Arc<dyn FsPort>,
        settings: BatchSettings,
    ) -> Self {
        Self {
            resolver,
            extractor,
            fs,
            settings,
        }
    }

    /// Run the pipeline end to end. Never fails: fatal conditions are
    /// recorded in the returned report.
    pub async fn execute(
        &self,
        source_reference: &str,
        manifest: ManifestSource,
        cancel: &CancelFlag,
    ) -> RunReport {
        let report = RunReport::new();
        info!(source = source_reference, "Starting clipping run");

        let (report, source) = match self.resolve_source(report, source_reference).await {
            Step::Next(report, source) => (report, source),
            Step::Finished(report) => return report,
        };

        let (report, requests) = match self.read_manifest(report, manifest).await {
            Step::Next(report, requests) => (report, requests),
            Step::Finished(report) => return report,
        };

        self.extract_clips(report, source, requests, cancel).await
    }

    async fn resolve_source(&self, mut report: RunReport, reference: &str) -> Step<Arc<ResolvedSource>> {
        report.state = RunState::ResolvingSource;

        match self.resolver.resolve(reference).await {
            Ok(source) => {
                report.source = Some(source.clone());
                report.state = RunState::ReadingManifest;
                Step::Next(report, Arc::new(source))
            }
            Err(e) => Step::Finished(Self::abort(report, e)),
        }
    }

    async fn read_manifest(&self, mut report: RunReport, manifest: ManifestSource) -> Step<Vec<ClipRequest>> {
        let bytes = match manifest {
            ManifestSource::Bytes(bytes) => bytes,
            ManifestSource::Path(path) => match self.fs.read_file(&path).await {
                Ok(bytes) => bytes,
                Err(e) => return Step::Finished(Self::finish_with_error(report, e)),
            },
        };

        let Manifest { requests, skipped } = match ManifestReader::parse(&bytes) {
            Ok(manifest) => manifest,
            Err(e) => return Step::Finished(Self::finish_with_error(report, e)),
        };

        info!(
            requests = requests.len(),
            skipped = skipped.len(),
            "Manifest read"
        );
        report.rows.extend(skipped.into_iter().map(RowReport::Skipped));
        report.state = RunState::ExtractingClips;
        Step::Next(report, requests)
    }

    async fn extract_clips(
        &self,
        mut report: RunReport,
        source: Arc<ResolvedSource>,
        requests: Vec<ClipRequest>,
        cancel: &CancelFlag,
    ) -> RunReport {
        if let Err(e) = self.fs.create_directory(&self.settings.output_dir).await {
            report
                .rows
                .extend(requests.into_iter().map(RowReport::NotAttempted));
            return Self::finish_with_error(report, e);
        }

        let mut namer = OutputNamer::new(&self.settings.output_dir, &self.settings.container_extension);
        let jobs: Vec<(ClipRequest, PathBuf)> = requests
            .into_iter()
            .map(|request| {
                let path = namer.assign(&request);
                (request, path)
            })
            .collect();

        let fatal = if self.settings.workers <= 1 {
            self.extract_sequential(&mut report, &source, jobs, cancel).await
        } else {
            self.extract_parallel(&mut report, source, jobs, cancel).await
        };

        // Rows interrupted mid-fallback also count as a cancelled run
        if cancel.is_cancelled() {
            report.cancelled = true;
        }
        report.rows.sort_by_key(RowReport::row_index);
        match fatal {
            Some(e) => Self::abort(report, e),
            None => Self::finish(report),
        }
    }

    async fn extract_sequential(
        &self,
        report: &mut RunReport,
        source: &ResolvedSource,
        jobs: Vec<(ClipRequest, PathBuf)>,
        cancel: &CancelFlag,
    ) -> Option<DomainError> {
        let mut jobs = jobs.into_iter();

        while let Some((request, path)) = jobs.next() {
            if cancel.is_cancelled() {
                warn!(row = request.row_index, "Run cancelled, remaining rows not attempted");
                report.cancelled = true;
                report.rows.push(RowReport::NotAttempted(request));
                report.rows.extend(jobs.by_ref().map(|(request, _)| RowReport::NotAttempted(request)));
                return None;
            }

            match self.extractor.extract(&request, &path, source, cancel).await {
                Ok(outcome) => {
                    Self::log_outcome(&outcome);
                    report.rows.push(RowReport::Extracted(outcome));
                }
                Err(e) => {
                    report.rows.push(RowReport::NotAttempted(request));
                    report.rows.extend(jobs.by_ref().map(|(request, _)| RowReport::NotAttempted(request)));
                    return Some(e);
                }
            }
        }

        None
    }

    async fn extract_parallel(
        &self,
        report: &mut RunReport,
        source: Arc<ResolvedSource>,
        jobs: Vec<(ClipRequest, PathBuf)>,
        cancel: &CancelFlag,
    ) -> Option<DomainError> {
        let workers = self.settings.workers;
        info!(workers, "Extracting clips in parallel");

        let semaphore = Arc::new(Semaphore::new(workers));
        let halted = Arc::new(AtomicBool::new(false));
        let mut pending: BTreeMap<usize, ClipRequest> = BTreeMap::new();
        let mut tasks = JoinSet::new();
        let mut jobs = jobs.into_iter();

        while let Some((request, path)) = jobs.next() {
            let permit = Arc::clone(&semaphore).acquire_owned().await;
            let stop = cancel.is_cancelled() || halted.load(Ordering::SeqCst);
            let permit = match permit {
                Ok(permit) if !stop => permit,
                _ => {
                    if cancel.is_cancelled() {
                        warn!(row = request.row_index, "Run cancelled, remaining rows not attempted");
                        report.cancelled = true;
                    }
                    report.rows.push(RowReport::NotAttempted(request));
                    report.rows.extend(jobs.by_ref().map(|(request, _)| RowReport::NotAttempted(request)));
                    break;
                }
            };

            pending.insert(request.row_index, request.clone());
            let extractor = Arc::clone(&self.extractor);
            let source = Arc::clone(&source);
            let halted = Arc::clone(&halted);
            let cancel = cancel.clone();
            tasks.spawn(async move {
                let _permit = permit;
                let result = extractor.extract(&request, &path, &source, &cancel).await;
                if result.as_ref().is_err_and(DomainError::is_fatal) {
                    halted.store(true, Ordering::SeqCst);
                }
                (request.row_index, result)
            });
        }

        let mut fatal = None;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((row, Ok(outcome))) => {
                    pending.remove(&row);
                    Self::log_outcome(&outcome);
                    report.rows.push(RowReport::Extracted(outcome));
                }
                Ok((row, Err(e))) => {
                    if let Some(request) = pending.remove(&row) {
                        report.rows.push(RowReport::NotAttempted(request));
                    }
                    fatal.get_or_insert(e);
                }
                Err(e) => error!(error = %e, "Extraction task failed"),
            }
        }

        // Rows whose task panicked
        report
            .rows
            .extend(pending.into_values().map(RowReport::NotAttempted));

        fatal
    }

    fn log_outcome(outcome: &ClipOutcome) {
        let strategies: Vec<String> = outcome
            .attempts
            .iter()
            .map(|attempt| attempt.strategy.to_string())
            .collect();
        info!(
            row = outcome.request.row_index,
            timestamp = %outcome.request.raw_timestamp,
            label = %outcome.request.label,
            output = %outcome.output_path.display(),
            strategies = %strategies.join(","),
            status = %outcome.status,
            "Row finished"
        );
    }

    fn finish(mut report: RunReport) -> RunReport {
        report.state = RunState::Done;
        report.finished_at = Some(Utc::now());
        let counts = report.counts();
        info!(
            succeeded = counts.succeeded,
            skipped = counts.skipped,
            failed = counts.failed,
            not_attempted = counts.not_attempted,
            cancelled = report.cancelled,
            "Run finished"
        );
        report
    }

    /// End in `Done` with a single-cause error and no further extraction
    fn finish_with_error(mut report: RunReport, e: DomainError) -> RunReport {
        error!(error = %e, "Run ended before extraction");
        report.fatal = Some(e.to_string());
        Self::finish(report)
    }

    fn abort(mut report: RunReport, e: DomainError) -> RunReport {
        if matches!(e, DomainError::ToolUnavailable { .. }) {
            error!(error = %e, "Required tool missing, aborting run");
            report.state = RunState::AbortedMissingTool;
            report.fatal = Some(e.to_string());
            report.finished_at = Some(Utc::now());
            report
        } else {
            Self::finish_with_error(report, e)
        }
    }
}
