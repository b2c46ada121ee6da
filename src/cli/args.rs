//! Command-line argument definitions

use std::path::PathBuf;

use clap::{ArgGroup, Args, Subcommand};
use clap_num::number_range;

use crate::domain::model::{MediaKind, VideoPreset};

/// Arguments for the convert command
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["input", "url"])))]
pub struct ConvertArgs {
    /// Local media file
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Remote media URL (direct image link or a page yt-dlp understands)
    #[arg(short, long)]
    pub url: Option<String>,

    /// Kind of media being converted (image, video, audio)
    #[arg(short, long, value_parser = parse_media_kind)]
    pub kind: MediaKind,

    /// Output directory (default: from settings)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Target format extension, e.g. jpg, webp, mp4, mp3
    #[arg(short, long)]
    pub format: String,

    /// Image quality for jpg/jpeg/webp output (1-100)
    #[arg(short, long, value_parser = parse_quality)]
    pub quality: Option<u8>,

    /// Scale by percentage of the source size
    #[arg(long)]
    pub scale_percent: Option<f64>,

    /// Target width in pixels; height follows the aspect ratio if unset
    #[arg(long, allow_negative_numbers = true)]
    pub width: Option<i64>,

    /// Target height in pixels; width follows the aspect ratio if unset
    #[arg(long, allow_negative_numbers = true)]
    pub height: Option<i64>,

    /// Video preset: 1080p, 720p, 480p, best_crf, medium_crf, low_crf
    #[arg(long, value_parser = parse_video_preset)]
    pub preset: Option<VideoPreset>,

    /// Output the outcome in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the classify command
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// URL to classify
    pub url: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the tools command
#[derive(Args, Debug)]
pub struct ToolsArgs {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Settings subcommands
#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Print the effective settings
    Show {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Persist a new default output directory
    SetOutputDir {
        /// Directory used when convert is given no --output-dir
        dir: PathBuf,
    },
}

fn parse_quality(value: &str) -> Result<u8, String> {
    number_range(value, 1, 100)
}

fn parse_media_kind(value: &str) -> Result<MediaKind, String> {
    MediaKind::parse(value).map_err(|e| e.to_string())
}

fn parse_video_preset(value: &str) -> Result<VideoPreset, String> {
    VideoPreset::parse(value).map_err(|e| e.to_string())
}
