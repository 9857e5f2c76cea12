// Application layer - Use case interactors

pub mod batch_interactor;
pub mod cancel;
pub mod container;
pub mod source_resolver;

// Re-export interactors
pub use batch_interactor::{BatchInteractor, BatchSettings, ManifestSource};
pub use cancel::CancelFlag;
pub use container::{AppContainer, DefaultAppContainer};
pub use source_resolver::SourceResolver;
