// Ports - Interface definitions (contracts)

use std::path::Path;

use async_trait::async_trait;

use crate::domain::errors::*;

/// Port for the external URL-resolution tool.
///
/// Implementations own all parsing of the tool's text output.
#[async_trait]
pub trait ResolvePort: Send + Sync {
    /// Ask the tool for playable stream URLs of `reference`.
    ///
    /// Returns the URLs in the order the tool printed them.
    /// `ResolutionFailed` when the tool ran and reported failure,
    /// `ToolUnavailable` when it could not be launched.
    async fn resolve_stream_urls(
        &self,
        reference: &str,
        format: &str,
    ) -> Result<Vec<String>, DomainError>;

    /// Name of the tool, for diagnostics
    fn tool_name(&self) -> &str;

    /// Check the tool can be launched at all
    async fn probe_tool(&self) -> Result<String, DomainError>;
}

/// Exit report of one transcoder invocation
#[derive(Debug, Clone, PartialEq)]
pub struct ToolRun {
    pub success: bool,
    pub exit_code: Option<i32>,
    /// Captured diagnostic stream (stderr)
    pub diagnostics: String,
}

impl ToolRun {
    pub fn ok() -> Self {
        Self {
            success: true,
            exit_code: Some(0),
            diagnostics: String::new(),
        }
    }

    pub fn failed(exit_code: i32, diagnostics: impl Into<String>) -> Self {
        Self {
            success: false,
            exit_code: Some(exit_code),
            diagnostics: diagnostics.into(),
        }
    }
}

/// Port for the external media transcoding tool
#[async_trait]
pub trait TranscodePort: Send + Sync {
    /// Run the transcoder with `args` and wait for it to exit.
    ///
    /// A non-zero exit is an `Ok(ToolRun)` with `success == false`; only a
    /// launch failure is an error (`ToolUnavailable`).
    async fn run(&self, args: &[String]) -> Result<ToolRun, DomainError>;

    /// Name of the tool, for diagnostics
    fn tool_name(&self) -> &str;

    /// Check the tool can be launched at all
    async fn probe_tool(&self) -> Result<String, DomainError>;
}

/// Port for file system operations
#[async_trait]
pub trait FsPort: Send + Sync {
    /// Check if file exists
    async fn file_exists(&self, file_path: &Path) -> Result<bool, DomainError>;

    /// Create directory and parents; succeeds if it already exists
    async fn create_directory(&self, dir_path: &Path) -> Result<(), DomainError>;

    /// Delete file; succeeds if it is already gone
    async fn remove_file(&self, file_path: &Path) -> Result<(), DomainError>;

    /// Read a whole file
    async fn read_file(&self, file_path: &Path) -> Result<Vec<u8>, DomainError>;
}
