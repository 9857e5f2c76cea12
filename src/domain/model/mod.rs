// Domain models - Core types and data structures

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::rules::LabelRules;

/// Clip start offset, in whole seconds from the beginning of the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp {
    pub seconds: u64,
}

impl Timestamp {
    /// Create a new Timestamp from seconds
    pub fn from_seconds(seconds: u64) -> Self {
        Self { seconds }
    }

    /// Parse `H:M:S`, `M:S` or a bare second count.
    ///
    /// Fields are not range-checked (`01:75` is 135 seconds). Signed or
    /// non-numeric fields are rejected, so the result is never negative.
    pub fn parse(time_str: &str) -> Result<Self, DomainError> {
        let trimmed = time_str.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidTimestamp(
                "timestamp is empty".to_string(),
            ));
        }

        let parts: Vec<&str> = trimmed.split(':').collect();
        if parts.len() > 3 {
            return Err(DomainError::InvalidTimestamp(format!(
                "'{}' has {} fields, expected at most 3 (HH:MM:SS, MM:SS or seconds)",
                time_str,
                parts.len()
            )));
        }

        let mut total: u64 = 0;
        for part in &parts {
            let field = Self::parse_field(part, time_str)?;
            total = total
                .checked_mul(60)
                .and_then(|t| t.checked_add(field))
                .ok_or_else(|| {
                    DomainError::InvalidTimestamp(format!("'{}' is out of range", time_str))
                })?;
        }

        Ok(Self::from_seconds(total))
    }

    fn parse_field(field: &str, original: &str) -> Result<u64, DomainError> {
        let field = field.trim();
        if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::InvalidTimestamp(format!(
                "'{}' contains a non-numeric field '{}'",
                original, field
            )));
        }
        field
            .parse::<u64>()
            .map_err(|_| DomainError::InvalidTimestamp(format!("'{}' is out of range", original)))
    }

    pub fn as_seconds(&self) -> u64 {
        self.seconds
    }

    /// Format as HH:MM:SS
    pub fn format_hms(&self) -> String {
        let hours = self.seconds / 3600;
        let minutes = (self.seconds % 3600) / 60;
        let seconds = self.seconds % 60;
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_hms())
    }
}

/// One manifest row's parsed intent to extract a single clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipRequest {
    /// 1-based data row index in the manifest
    pub row_index: usize,
    pub raw_timestamp: String,
    pub start: Timestamp,
    /// `ClipName` cell as written, if present and non-blank
    pub clip_name: Option<String>,
    /// Filesystem-safe label used to name the output file
    pub label: String,
}

impl ClipRequest {
    /// Create a new clip request, parsing the timestamp and deriving the label
    pub fn new(
        row_index: usize,
        raw_timestamp: &str,
        clip_name: Option<&str>,
    ) -> Result<Self, DomainError> {
        if row_index == 0 {
            return Err(DomainError::ManifestUnreadable(
                "row indices start at 1".to_string(),
            ));
        }

        let start = Timestamp::parse(raw_timestamp)?;
        let clip_name = clip_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        let label = LabelRules::derive_label(row_index, raw_timestamp.trim(), clip_name.as_deref());

        Ok(Self {
            row_index,
            raw_timestamp: raw_timestamp.to_string(),
            start,
            clip_name,
            label,
        })
    }

    pub fn start_seconds(&self) -> u64 {
        self.start.as_seconds()
    }
}

/// The stream URL every extraction in a run reads from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSource {
    pub original_reference: String,
    /// First URL printed by the resolver, or the original reference on fallback
    pub stream_url: String,
    /// True when resolution failed and `stream_url` is the original reference
    pub fell_back: bool,
    /// Additional URLs the resolver printed (e.g. a separate audio track); not used
    pub ignored_urls: Vec<String>,
}

impl ResolvedSource {
    pub fn resolved(original_reference: &str, mut urls: Vec<String>) -> Option<Self> {
        if urls.is_empty() {
            return None;
        }
        let stream_url = urls.remove(0);
        Some(Self {
            original_reference: original_reference.to_string(),
            stream_url,
            fell_back: false,
            ignored_urls: urls,
        })
    }

    pub fn fallback(original_reference: &str) -> Self {
        Self {
            original_reference: original_reference.to_string(),
            stream_url: original_reference.to_string(),
            fell_back: true,
            ignored_urls: Vec::new(),
        }
    }
}

/// Extraction strategy, tried in the order the extractor lists them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtractionStrategy {
    /// Remux the compressed stream without re-encoding
    StreamCopy,
    /// Decode and re-compress the segment
    ReEncode,
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            ExtractionStrategy::StreamCopy => "stream-copy",
            ExtractionStrategy::ReEncode => "re-encode",
        })
    }
}

/// Terminal status of one manifest row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClipStatus {
    Success,
    SkippedInvalidInput,
    ExtractionFailed,
}

impl fmt::Display for ClipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            ClipStatus::Success => "success",
            ClipStatus::SkippedInvalidInput => "skipped",
            ClipStatus::ExtractionFailed => "failed",
        })
    }
}

/// One transcoder invocation and what it reported
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub strategy: ExtractionStrategy,
    pub success: bool,
    pub exit_code: Option<i32>,
    pub diagnostics: String,
}

/// Result of running the extractor on one clip request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipOutcome {
    pub request: ClipRequest,
    pub output_path: PathBuf,
    pub status: ClipStatus,
    pub strategy_used: Option<ExtractionStrategy>,
    pub attempts: Vec<AttemptRecord>,
    /// Short failure reason when the row did not succeed
    pub note: Option<String>,
}

impl ClipOutcome {
    pub fn succeeded(&self) -> bool {
        self.status == ClipStatus::Success
    }
}

/// A manifest row that never became a clip request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRow {
    pub row_index: usize,
    pub raw_timestamp: Option<String>,
    pub reason: String,
}

/// Per-row entry of the run report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowReport {
    Extracted(ClipOutcome),
    Skipped(SkippedRow),
    /// Row was pending when the run was cancelled or aborted
    NotAttempted(ClipRequest),
}

impl RowReport {
    pub fn row_index(&self) -> usize {
        match self {
            RowReport::Extracted(outcome) => outcome.request.row_index,
            RowReport::Skipped(skipped) => skipped.row_index,
            RowReport::NotAttempted(request) => request.row_index,
        }
    }

    pub fn status(&self) -> Option<ClipStatus> {
        match self {
            RowReport::Extracted(outcome) => Some(outcome.status),
            RowReport::Skipped(_) => Some(ClipStatus::SkippedInvalidInput),
            RowReport::NotAttempted(_) => None,
        }
    }
}

/// Pipeline state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Idle,
    ResolvingSource,
    ReadingManifest,
    ExtractingClips,
    Done,
    AbortedMissingTool,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Idle => "idle",
            RunState::ResolvingSource => "resolving-source",
            RunState::ReadingManifest => "reading-manifest",
            RunState::ExtractingClips => "extracting-clips",
            RunState::Done => "done",
            RunState::AbortedMissingTool => "aborted-missing-tool",
        };
        f.pad(name)
    }
}

/// Row tallies for a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCounts {
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub not_attempted: usize,
}

/// Everything a pipeline run produced, in manifest order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub state: RunState,
    pub source: Option<ResolvedSource>,
    pub rows: Vec<RowReport>,
    /// Single-cause message when the run ended on a fatal condition
    pub fatal: Option<String>,
    pub cancelled: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            state: RunState::Idle,
            source: None,
            rows: Vec::new(),
            fatal: None,
            cancelled: false,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn counts(&self) -> RunCounts {
        let mut counts = RunCounts::default();
        for row in &self.rows {
            match row.status() {
                Some(ClipStatus::Success) => counts.succeeded += 1,
                Some(ClipStatus::SkippedInvalidInput) => counts.skipped += 1,
                Some(ClipStatus::ExtractionFailed) => counts.failed += 1,
                None => counts.not_attempted += 1,
            }
        }
        counts
    }

    pub fn outcomes(&self) -> impl Iterator<Item = &ClipOutcome> {
        self.rows.iter().filter_map(|row| match row {
            RowReport::Extracted(outcome) => Some(outcome),
            _ => None,
        })
    }

    /// True when the run reached `Done` without a fatal condition
    pub fn completed(&self) -> bool {
        self.state == RunState::Done && self.fatal.is_none()
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}
