// Adapters - External system implementations

pub mod exec_ffmpeg;
pub mod exec_ytdlp;
pub mod fs_local;
pub mod process;
pub mod toml_config;

// Re-export adapters
pub use exec_ffmpeg::FFmpegAdapter;
pub use exec_ytdlp::YtDlpAdapter;
pub use fs_local::FsLocalAdapter;
pub use toml_config::{ClipperConfig, ResolverConfig, TomlConfigAdapter, TranscoderConfig};
