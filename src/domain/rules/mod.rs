// Domain rules - Business logic and policies

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::domain::model::*;
use crate::utils::path::PathUtils;

/// Rules for turning manifest cells into clip labels
pub struct LabelRules;

impl LabelRules {
    /// Label for a row: the sanitized `ClipName`, or `clip_<row>_<timestamp>`
    /// with the timestamp's colons turned into dashes.
    pub fn derive_label(row_index: usize, raw_timestamp: &str, clip_name: Option<&str>) -> String {
        match clip_name {
            Some(name) => PathUtils::sanitize_label(name),
            None => PathUtils::sanitize_label(&format!(
                "clip_{}_{}",
                row_index,
                raw_timestamp.replace(':', "-")
            )),
        }
    }
}

/// Assigns every clip request a distinct output path within one run.
///
/// The first row to claim a label gets `<label>.<ext>`; later rows with the
/// same label get the row index appended. Names are compared
/// case-insensitively so the scheme holds on case-folding filesystems.
#[derive(Debug)]
pub struct OutputNamer {
    output_dir: PathBuf,
    extension: String,
    taken: HashSet<String>,
}

impl OutputNamer {
    pub fn new(output_dir: impl AsRef<Path>, extension: &str) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            extension: extension.trim_start_matches('.').to_string(),
            taken: HashSet::new(),
        }
    }

    pub fn assign(&mut self, request: &ClipRequest) -> PathBuf {
        let mut stem = request.label.clone();
        while !self.taken.insert(stem.to_lowercase()) {
            stem = format!("{}_{}", stem, request.row_index);
        }
        self.output_dir
            .join(format!("{}.{}", stem, self.extension))
    }
}

/// Ordered list of extraction strategies; the extractor walks it until one
/// succeeds.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyChain {
    strategies: Vec<ExtractionStrategy>,
}

impl StrategyChain {
    pub fn new(strategies: Vec<ExtractionStrategy>) -> Self {
        Self { strategies }
    }

    pub fn iter(&self) -> impl Iterator<Item = ExtractionStrategy> + '_ {
        self.strategies.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl Default for StrategyChain {
    /// Stream copy first, re-encode as the fallback
    fn default() -> Self {
        Self::new(vec![
            ExtractionStrategy::StreamCopy,
            ExtractionStrategy::ReEncode,
        ])
    }
}
