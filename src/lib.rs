//! mediaconv library
//!
//! Media acquisition and transcode pipeline: classifies a source, fetches
//! remote media into a scoped workspace, and converts it with FFmpeg.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod planner;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use app::{AppContainer, ConvertInteractor, DefaultAppContainer};
pub use domain::errors::DomainError;
pub use domain::model::{
    ConversionOutcome, ConversionRequest, FetchStrategy, MediaKind, MediaSource, ProgressEvent,
    Scale, TransferProgress, VideoPreset,
};
pub use planner::{CommandBuilder, TranscodePlan};
