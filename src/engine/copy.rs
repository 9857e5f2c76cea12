//! Stream copy implementation

use crate::engine::{output_args, window_args, ExtractionJob};

/// Stream copy clipper for lossless operations
pub struct StreamCopyClipper;

impl StreamCopyClipper {
    /// Arguments that cut the window and remux it without re-encoding
    pub fn args(job: &ExtractionJob<'_>) -> Vec<String> {
        let mut args = window_args(job);
        args.extend(["-c".to_string(), "copy".to_string()]);
        args.extend(output_args(job));
        args
    }
}
