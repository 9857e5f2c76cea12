//! Scripted port implementations shared by the integration tests
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use clipper_batch::adapters::{ClipperConfig, FsLocalAdapter};
use clipper_batch::app::{AppContainer, DefaultAppContainer};
use clipper_batch::ports::{FsPort, ResolvePort, ToolRun, TranscodePort};
use clipper_batch::DomainError;

/// Resolver returning a canned answer
pub enum FakeResolver {
    Urls(Vec<String>),
    Fails,
    Missing,
}

#[async_trait]
impl ResolvePort for FakeResolver {
    async fn resolve_stream_urls(
        &self,
        _reference: &str,
        _format: &str,
    ) -> Result<Vec<String>, DomainError> {
        match self {
            FakeResolver::Urls(urls) => Ok(urls.clone()),
            FakeResolver::Fails => Err(DomainError::ResolutionFailed(
                "ERROR: Unsupported URL".to_string(),
            )),
            FakeResolver::Missing => Err(DomainError::tool_unavailable("yt-dlp", "not found on PATH")),
        }
    }

    fn tool_name(&self) -> &str {
        "yt-dlp"
    }

    async fn probe_tool(&self) -> Result<String, DomainError> {
        match self {
            FakeResolver::Missing => Err(DomainError::tool_unavailable("yt-dlp", "not found on PATH")),
            _ => Ok("2024.01.01".to_string()),
        }
    }
}

type Behavior = Box<dyn Fn(&[String]) -> Result<ToolRun, DomainError> + Send + Sync>;

/// Transcoder that records every argument list and writes the output path
/// (last argument) on each launched call, like a real tool leaving partial
/// output behind.
pub struct FakeTranscoder {
    behavior: Behavior,
    available: bool,
    refuses_existing_output: bool,
    calls: Mutex<Vec<Vec<String>>>,
}

impl FakeTranscoder {
    pub fn new(behavior: impl Fn(&[String]) -> ToolRun + Send + Sync + 'static) -> Self {
        Self::fallible(move |args| Ok(behavior(args)))
    }

    /// Behavior that can also fail to launch
    pub fn fallible(
        behavior: impl Fn(&[String]) -> Result<ToolRun, DomainError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            behavior: Box::new(behavior),
            available: true,
            refuses_existing_output: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every invocation succeeds
    pub fn succeeding() -> Self {
        Self::new(|_| ToolRun::ok())
    }

    /// Stream copy fails, re-encode succeeds
    pub fn copy_fails() -> Self {
        Self::new(|args| {
            if is_stream_copy(args) {
                ToolRun::failed(1, "Non-monotonous DTS in output stream")
            } else {
                ToolRun::ok()
            }
        })
    }

    /// The binary cannot be launched
    pub fn missing() -> Self {
        let mut fake = Self::fallible(|_| Err(DomainError::tool_unavailable("ffmpeg", "not found on PATH")));
        fake.available = false;
        fake
    }

    /// Exit non-zero on `-n` when the output already exists, as ffmpeg does
    pub fn refusing_existing_output(mut self) -> Self {
        self.refuses_existing_output = true;
        self
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranscodePort for FakeTranscoder {
    async fn run(&self, args: &[String]) -> Result<ToolRun, DomainError> {
        self.calls.lock().unwrap().push(args.to_vec());
        let result = (self.behavior)(args)?;

        if let Some(output) = args.last() {
            let no_clobber = args.iter().any(|arg| arg == "-n");
            if self.refuses_existing_output && no_clobber && Path::new(output).exists() {
                return Ok(ToolRun::failed(
                    1,
                    format!("File '{}' already exists. Exiting.", output),
                ));
            }
            std::fs::write(output, b"clip").unwrap();
        }
        Ok(result)
    }

    fn tool_name(&self) -> &str {
        "ffmpeg"
    }

    async fn probe_tool(&self) -> Result<String, DomainError> {
        if self.available {
            Ok("ffmpeg version 6.1".to_string())
        } else {
            Err(DomainError::tool_unavailable("ffmpeg", "not found on PATH"))
        }
    }
}

pub fn is_stream_copy(args: &[String]) -> bool {
    args.windows(2).any(|pair| pair[0] == "-c" && pair[1] == "copy")
}

/// Value following `flag` in an argument list
pub fn arg_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

pub fn test_config(output_dir: &Path) -> ClipperConfig {
    ClipperConfig {
        output_dir: output_dir.to_path_buf(),
        ..ClipperConfig::default()
    }
}

pub fn container_with(
    config: &ClipperConfig,
    resolver: FakeResolver,
    transcoder: Arc<FakeTranscoder>,
) -> DefaultAppContainer {
    let fs: Arc<dyn FsPort> = Arc::new(FsLocalAdapter::new());
    DefaultAppContainer::with_ports(config, Arc::new(resolver), transcoder, fs).unwrap()
}

pub fn resolved(url: &str) -> FakeResolver {
    FakeResolver::Urls(vec![url.to_string()])
}

/// Sorted file names in `dir`, empty when it does not exist
pub fn files_in(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

pub fn write_manifest(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("timestamps.csv");
    std::fs::write(&path, contents).unwrap();
    path
}

pub fn batch(container: &DefaultAppContainer) -> Arc<clipper_batch::BatchInteractor> {
    container.batch_interactor()
}
