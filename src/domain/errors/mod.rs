// Domain errors - Error types for the domain layer

use std::fmt;

/// Domain-specific error types
///
/// Row-local conditions (`InvalidTimestamp`, `ExtractionFailed`) are captured
/// into the row's outcome. `MissingRequiredColumn`, `ManifestUnreadable` and
/// `ToolUnavailable` end the run.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Timestamp text could not be turned into a second offset
    InvalidTimestamp(String),
    /// Manifest header lacks a required column
    MissingRequiredColumn(String),
    /// Manifest bytes could not be read as a table
    ManifestUnreadable(String),
    /// URL resolution tool ran but produced no usable URL
    ResolutionFailed(String),
    /// Every extraction strategy failed for a row
    ExtractionFailed(String),
    /// A required external binary could not be launched
    ToolUnavailable { tool: String, message: String },
    /// Filesystem operation failed
    FsFail(String),
    /// Configuration value rejected
    BadConfig(String),
}

impl DomainError {
    /// Whether this condition must end the run
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DomainError::MissingRequiredColumn(_)
                | DomainError::ManifestUnreadable(_)
                | DomainError::ToolUnavailable { .. }
        )
    }

    pub fn tool_unavailable(tool: impl Into<String>, message: impl Into<String>) -> Self {
        DomainError::ToolUnavailable {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::InvalidTimestamp(msg) => write!(f, "Invalid timestamp: {}", msg),
            DomainError::MissingRequiredColumn(col) => {
                write!(f, "Manifest is missing required column '{}'", col)
            }
            DomainError::ManifestUnreadable(msg) => write!(f, "Manifest unreadable: {}", msg),
            DomainError::ResolutionFailed(msg) => write!(f, "Source resolution failed: {}", msg),
            DomainError::ExtractionFailed(msg) => write!(f, "Extraction failed: {}", msg),
            DomainError::ToolUnavailable { tool, message } => {
                write!(f, "Required tool '{}' is unavailable: {}", tool, message)
            }
            DomainError::FsFail(msg) => write!(f, "Filesystem error: {}", msg),
            DomainError::BadConfig(msg) => write!(f, "Bad configuration: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
