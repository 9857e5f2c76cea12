//! Timestamp manifest reading
//!
//! A manifest is CSV with a header row. `Timestamp` is required, `ClipName`
//! is optional. Rows whose timestamp is missing or malformed are reported
//! as skipped and never become clip requests.

use csv::{ReaderBuilder, StringRecord};
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::errors::DomainError;
use crate::domain::model::{ClipRequest, SkippedRow};

pub const TIMESTAMP_COLUMN: &str = "Timestamp";
pub const CLIP_NAME_COLUMN: &str = "ClipName";

/// Parsed manifest: requests and skipped rows, each in manifest order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Manifest {
    pub requests: Vec<ClipRequest>,
    pub skipped: Vec<SkippedRow>,
}

/// Column positions found in the header
#[derive(Debug, Clone, Copy)]
struct Columns {
    timestamp: usize,
    clip_name: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self, DomainError> {
        let position = |wanted: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == wanted)
        };

        let timestamp = position(TIMESTAMP_COLUMN)
            .ok_or_else(|| DomainError::MissingRequiredColumn(TIMESTAMP_COLUMN.to_string()))?;

        Ok(Self {
            timestamp,
            clip_name: position(CLIP_NAME_COLUMN),
        })
    }
}

/// Batch reader for timestamp manifests
pub struct ManifestReader;

impl ManifestReader {
    /// Parse manifest bytes.
    ///
    /// Fails with `MissingRequiredColumn` when the header has no `Timestamp`
    /// column; every row-level problem is recorded in `Manifest::skipped`.
    pub fn parse(bytes: &[u8]) -> Result<Manifest, DomainError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let headers = reader
            .headers()
            .map_err(|e| DomainError::ManifestUnreadable(e.to_string()))?
            .clone();
        let columns = Columns::locate(&headers)?;
        debug!(?columns, "Located manifest columns");

        let mut manifest = Manifest::default();
        for (i, record) in reader.records().enumerate() {
            let row_index = i + 1;
            match record {
                Ok(record) => match Self::parse_row(row_index, &record, columns) {
                    Ok(request) => manifest.requests.push(request),
                    Err(skipped) => {
                        warn!(
                            row = row_index,
                            timestamp = ?skipped.raw_timestamp,
                            reason = %skipped.reason,
                            "Skipping manifest row"
                        );
                        manifest.skipped.push(skipped);
                    }
                },
                Err(e) => {
                    warn!(row = row_index, error = %e, "Skipping unreadable manifest row");
                    manifest.skipped.push(SkippedRow {
                        row_index,
                        raw_timestamp: None,
                        reason: format!("unreadable row: {}", e),
                    });
                }
            }
        }

        Ok(manifest)
    }

    fn parse_row(
        row_index: usize,
        record: &StringRecord,
        columns: Columns,
    ) -> Result<ClipRequest, SkippedRow> {
        let raw_timestamp = record
            .get(columns.timestamp)
            .map(str::trim)
            .filter(|ts| !ts.is_empty())
            .ok_or_else(|| SkippedRow {
                row_index,
                raw_timestamp: None,
                reason: format!("missing '{}'", TIMESTAMP_COLUMN),
            })?;

        let clip_name = columns.clip_name.and_then(|idx| record.get(idx));

        ClipRequest::new(row_index, raw_timestamp, clip_name).map_err(|e| SkippedRow {
            row_index,
            raw_timestamp: Some(raw_timestamp.to_string()),
            reason: e.to_string(),
        })
    }
}
