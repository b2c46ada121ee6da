// Adapters - External system implementations

pub mod exec_ffmpeg;
pub mod fetch_http;
pub mod fetch_ytdlp;
pub mod progress_channel;
pub mod toml_config;
pub mod tracing_log;

// Re-export adapters
pub use exec_ffmpeg::FFmpegAdapter;
pub use fetch_http::HttpFetchAdapter;
pub use fetch_ytdlp::YtDlpAdapter;
pub use progress_channel::{
    CallbackProgressAdapter, ChannelProgressAdapter, RecordingProgressAdapter,
};
pub use toml_config::{Settings, SettingsSource, TomlConfigAdapter};
pub use tracing_log::{TeeProgressAdapter, TracingLogAdapter};
