//! Clipper Batch Library
//!
//! Cuts fixed-length clips out of one source video at the timestamps listed
//! in a CSV manifest. The source reference is resolved to a stream URL with
//! an external resolver (yt-dlp); each clip is cut with an external
//! transcoder (ffmpeg), stream-copy first and re-encode as fallback.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod error;
pub mod manifest;
pub mod output;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use adapters::ClipperConfig;
pub use app::{AppContainer, BatchInteractor, CancelFlag, DefaultAppContainer, ManifestSource};
pub use domain::errors::DomainError;
pub use domain::model::{ClipOutcome, ClipRequest, ClipStatus, RowReport, RunReport, RunState, Timestamp};
pub use error::{ClipperError, ClipperResult};
