// Source resolver - resolves the run's stream URL once, with fallback

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::ResolvePort;

/// Applies the resolution policy on top of a [`ResolvePort`]:
/// the first URL wins, a failed resolution falls back to the original
/// reference, and only a missing tool is an error.
pub struct SourceResolver {
    port: Arc<dyn ResolvePort>,
    format: String,
}

impl SourceResolver {
    pub fn new(port: Arc<dyn ResolvePort>, format: impl Into<String>) -> Self {
        Self {
            port,
            format: format.into(),
        }
    }

    pub async fn resolve(&self, reference: &str) -> Result<ResolvedSource, DomainError> {
        info!(reference, tool = self.port.tool_name(), "Resolving source");

        let urls = match self.port.resolve_stream_urls(reference, &self.format).await {
            Ok(urls) => urls,
            Err(DomainError::ResolutionFailed(diagnostics)) => {
                warn!(
                    %diagnostics,
                    "Resolution failed, falling back to the original reference"
                );
                return Ok(ResolvedSource::fallback(reference));
            }
            Err(e) => return Err(e),
        };

        let Some(source) = ResolvedSource::resolved(reference, urls) else {
            warn!("Resolver returned no URL, falling back to the original reference");
            return Ok(ResolvedSource::fallback(reference));
        };

        if !source.ignored_urls.is_empty() {
            // Separate audio/video tracks are not muxed; only the first URL is used
            warn!(
                ignored = source.ignored_urls.len(),
                "Resolver returned several URLs, using the first"
            );
        }
        info!(stream_url = %source.stream_url, "Using resolved stream URL");

        Ok(source)
    }
}
