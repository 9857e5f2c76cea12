//! Run report writer

use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;

use crate::domain::model::*;
use crate::error::ClipperResult;
use crate::output::ReportFormat;

/// One planned extraction, as shown by a dry run
#[derive(Debug, Clone, Serialize)]
pub struct PlannedClip {
    pub request: ClipRequest,
    pub output_path: PathBuf,
}

#[derive(Serialize)]
struct PlanDocument<'a> {
    planned: &'a [PlannedClip],
    skipped: &'a [SkippedRow],
}

/// Renders run reports and dry-run plans
pub struct ReportWriter {
    format: ReportFormat,
}

impl ReportWriter {
    /// Create a new report writer
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Write a finished run's report
    pub fn write_report<W: Write>(&self, report: &RunReport, out: &mut W) -> ClipperResult<()> {
        match self.format {
            ReportFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, report)?;
                writeln!(out)?;
            }
            ReportFormat::Text => self.write_report_text(report, out)?,
        }
        Ok(())
    }

    /// Write a dry-run plan
    pub fn write_plan<W: Write>(
        &self,
        planned: &[PlannedClip],
        skipped: &[SkippedRow],
        out: &mut W,
    ) -> ClipperResult<()> {
        match self.format {
            ReportFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, &PlanDocument { planned, skipped })?;
                writeln!(out)?;
            }
            ReportFormat::Text => {
                writeln!(out, "{:>4}  {:<10}  {:>7}  {}", "Row", "Timestamp", "Offset", "Output")?;
                for clip in planned {
                    writeln!(
                        out,
                        "{:>4}  {:<10}  {:>6}s  {}",
                        clip.request.row_index,
                        clip.request.raw_timestamp,
                        clip.request.start_seconds(),
                        clip.output_path.display()
                    )?;
                }
                for row in skipped {
                    writeln!(out, "{:>4}  skipped: {}", row.row_index, row.reason)?;
                }
                writeln!(out)?;
                writeln!(out, "{} clip(s) planned, {} row(s) skipped", planned.len(), skipped.len())?;
            }
        }
        Ok(())
    }

    fn write_report_text<W: Write>(&self, report: &RunReport, out: &mut W) -> ClipperResult<()> {
        writeln!(out, "Clipping Run")?;
        writeln!(out, "============")?;
        writeln!(out, "State: {}", report.state)?;
        if let Some(source) = &report.source {
            let note = if source.fell_back { " (resolution failed, using reference)" } else { "" };
            writeln!(out, "Source: {}{}", source.original_reference, note)?;
        }
        if let Some(fatal) = &report.fatal {
            writeln!(out, "Error: {}", fatal)?;
        }
        if report.cancelled {
            writeln!(out, "Cancelled before all rows were processed")?;
        }
        writeln!(out)?;

        if !report.rows.is_empty() {
            writeln!(out, "{:>4}  {:<10}  {:<8}  {:<12}  {}", "Row", "Timestamp", "Status", "Strategy", "Detail")?;
            for row in &report.rows {
                self.write_row(row, out)?;
            }
            writeln!(out)?;
        }

        let counts = report.counts();
        writeln!(
            out,
            "Summary: {} succeeded, {} skipped, {} failed, {} not attempted",
            counts.succeeded, counts.skipped, counts.failed, counts.not_attempted
        )?;
        Ok(())
    }

    fn write_row<W: Write>(&self, row: &RowReport, out: &mut W) -> ClipperResult<()> {
        match row {
            RowReport::Extracted(outcome) => {
                let strategy = outcome
                    .strategy_used
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "-".to_string());
                let detail = match (&outcome.status, &outcome.note) {
                    (ClipStatus::Success, _) => outcome.output_path.display().to_string(),
                    (_, Some(note)) => note.clone(),
                    _ => outcome.output_path.display().to_string(),
                };
                writeln!(
                    out,
                    "{:>4}  {:<10}  {:<8}  {:<12}  {}",
                    outcome.request.row_index, outcome.request.raw_timestamp, outcome.status, strategy, detail
                )?;
            }
            RowReport::Skipped(skipped) => {
                writeln!(
                    out,
                    "{:>4}  {:<10}  {:<8}  {:<12}  {}",
                    skipped.row_index,
                    skipped.raw_timestamp.as_deref().unwrap_or("-"),
                    ClipStatus::SkippedInvalidInput,
                    "-",
                    skipped.reason
                )?;
            }
            RowReport::NotAttempted(request) => {
                writeln!(
                    out,
                    "{:>4}  {:<10}  {:<8}  {:<12}  {}",
                    request.row_index, request.raw_timestamp, "pending", "-", "not attempted"
                )?;
            }
        }
        Ok(())
    }
}
