//! Error handling module for the clipper binary and library entry points

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for clipper operations
#[derive(Error, Debug)]
pub enum ClipperError {
    /// Domain-level failure surfaced to the caller
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Run stopped because a required tool is missing
    #[error("Run aborted: {message}")]
    RunAborted { message: String },

    /// Run ended before extraction (unreadable manifest, missing column, ...)
    #[error("Run failed: {message}")]
    RunFailed { message: String },

    /// Strict mode: some rows did not produce a clip
    #[error("{failed} row(s) failed, {skipped} skipped, {not_attempted} not attempted")]
    IncompleteRun {
        failed: usize,
        skipped: usize,
        not_attempted: usize,
    },

    /// Tracing subscriber could not be installed
    #[error("Failed to initialize logging: {message}")]
    LoggingError { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON rendering error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for clipper operations
pub type ClipperResult<T> = std::result::Result<T, ClipperError>;
