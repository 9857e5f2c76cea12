use std::sync::Arc;

use crate::adapters::{ClipperConfig, FFmpegAdapter, FsLocalAdapter, YtDlpAdapter};
use crate::app::{
    batch_interactor::{BatchInteractor, BatchSettings},
    source_resolver::SourceResolver,
};
use crate::domain::errors::DomainError;
use crate::engine::ClipExtractor;
use crate::ports::{FsPort, ResolvePort, TranscodePort};

pub trait AppContainer: Send + Sync {
    fn batch_interactor(&self) -> Arc<BatchInteractor>;
    fn resolve_port(&self) -> Arc<dyn ResolvePort>;
    fn transcode_port(&self) -> Arc<dyn TranscodePort>;
}

pub struct DefaultAppContainer {
    batch_interactor: Arc<BatchInteractor>,
    resolve_port: Arc<dyn ResolvePort>,
    transcode_port: Arc<dyn TranscodePort>,
}

impl DefaultAppContainer {
    /// Wire the production adapters for `config`
    pub fn new(config: &ClipperConfig) -> Result<Self, DomainError> {
        let resolve_port: Arc<dyn ResolvePort> =
            Arc::new(YtDlpAdapter::new(config.resolver.program.clone()));
        let transcode_port: Arc<dyn TranscodePort> =
            Arc::new(FFmpegAdapter::new(config.transcoder.program.clone()));
        let fs_port: Arc<dyn FsPort> = Arc::new(FsLocalAdapter::new());

        Self::with_ports(config, resolve_port, transcode_port, fs_port)
    }

    /// Wire the interactors around caller-supplied ports
    pub fn with_ports(
        config: &ClipperConfig,
        resolve_port: Arc<dyn ResolvePort>,
        transcode_port: Arc<dyn TranscodePort>,
        fs_port: Arc<dyn FsPort>,
    ) -> Result<Self, DomainError> {
        config.validate()?;

        let resolver = SourceResolver::new(Arc::clone(&resolve_port), config.resolver.format.clone());
        let extractor = Arc::new(ClipExtractor::new(
            Arc::clone(&transcode_port),
            Arc::clone(&fs_port),
            config.engine_config(),
        ));
        let settings = BatchSettings {
            output_dir: config.output_dir.clone(),
            container_extension: config.container_extension.clone(),
            workers: config.effective_workers(),
        };

        let batch_interactor = Arc::new(BatchInteractor::new(resolver, extractor, fs_port, settings));

        Ok(Self {
            batch_interactor,
            resolve_port,
            transcode_port,
        })
    }
}

impl AppContainer for DefaultAppContainer {
    fn batch_interactor(&self) -> Arc<BatchInteractor> {
        Arc::clone(&self.batch_interactor)
    }

    fn resolve_port(&self) -> Arc<dyn ResolvePort> {
        Arc::clone(&self.resolve_port)
    }

    fn transcode_port(&self) -> Arc<dyn TranscodePort> {
        Arc::clone(&self.transcode_port)
    }
}
