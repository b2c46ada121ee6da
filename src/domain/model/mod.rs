// Domain models - Conversion request, progress events and outcomes

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Upper bound accepted for percentage scaling (10x)
pub const MAX_SCALE_PERCENTAGE: f64 = 1000.0;

/// Where the media to convert comes from
#[derive(Debug, Clone, PartialEq)]
pub enum MediaSource {
    /// File on the local file system
    Local(PathBuf),
    /// Remote URL that has to be fetched first
    Remote(String),
}

impl fmt::Display for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaSource::Local(path) => write!(f, "{}", path.display()),
            MediaSource::Remote(url) => write!(f, "{}", url),
        }
    }
}

/// Kind of media being converted; selects the downloader profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
        }
    }

    /// Parse media kind from string
    pub fn parse(kind_str: &str) -> Result<Self, DomainError> {
        match kind_str.trim().to_lowercase().as_str() {
            "image" => Ok(MediaKind::Image),
            "video" => Ok(MediaKind::Video),
            "audio" => Ok(MediaKind::Audio),
            other => Err(DomainError::Validation(format!(
                "Invalid media kind: {}. Valid kinds: image, video, audio",
                other
            ))),
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested resize of the output
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Scale {
    #[default]
    None,
    /// Scale both dimensions by a percentage (50.0 halves them)
    Percentage(f64),
    /// Target pixel dimensions; an unset side keeps the aspect ratio
    Pixels {
        width: Option<u32>,
        height: Option<u32>,
    },
}

/// Video quality presets mapped onto scale and CRF settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoPreset {
    #[serde(rename = "1080p")]
    P1080,
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "480p")]
    P480,
    #[serde(rename = "best_crf")]
    BestCrf,
    #[serde(rename = "medium_crf")]
    MediumCrf,
    #[serde(rename = "low_crf")]
    LowCrf,
}

impl VideoPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoPreset::P1080 => "1080p",
            VideoPreset::P720 => "720p",
            VideoPreset::P480 => "480p",
            VideoPreset::BestCrf => "best_crf",
            VideoPreset::MediumCrf => "medium_crf",
            VideoPreset::LowCrf => "low_crf",
        }
    }

    /// Parse preset from string
    pub fn parse(preset_str: &str) -> Result<Self, DomainError> {
        match preset_str.trim().to_lowercase().as_str() {
            "1080p" => Ok(VideoPreset::P1080),
            "720p" => Ok(VideoPreset::P720),
            "480p" => Ok(VideoPreset::P480),
            "best_crf" | "best-crf" | "bestcrf" => Ok(VideoPreset::BestCrf),
            "medium_crf" | "medium-crf" | "mediumcrf" => Ok(VideoPreset::MediumCrf),
            "low_crf" | "low-crf" | "lowcrf" => Ok(VideoPreset::LowCrf),
            other => Err(DomainError::Validation(format!(
                "Invalid video preset: {}. Valid presets: 1080p, 720p, 480p, best_crf, medium_crf, low_crf",
                other
            ))),
        }
    }

    /// Forced output resolution, if the preset implies one
    pub fn resolution(&self) -> Option<(u32, u32)> {
        match self {
            VideoPreset::P1080 => Some((1920, 1080)),
            VideoPreset::P720 => Some((1280, 720)),
            VideoPreset::P480 => Some((854, 480)),
            _ => None,
        }
    }

    /// Constant rate factor and x264 preset name
    pub fn encoder_settings(&self) -> (u8, &'static str) {
        match self {
            VideoPreset::BestCrf => (18, "veryfast"),
            VideoPreset::LowCrf => (28, "slow"),
            VideoPreset::P1080 | VideoPreset::P720 | VideoPreset::P480 | VideoPreset::MediumCrf => {
                (23, "medium")
            }
        }
    }
}

impl fmt::Display for VideoPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated conversion request. Built once per operation through
/// [`ConversionRequestBuilder`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    source: MediaSource,
    media_kind: MediaKind,
    output_dir: PathBuf,
    output_format: String,
    image_quality: Option<u8>,
    scale: Scale,
    video_preset: Option<VideoPreset>,
}

impl ConversionRequest {
    pub fn builder(
        source: MediaSource,
        media_kind: MediaKind,
        output_dir: impl Into<PathBuf>,
        output_format: impl Into<String>,
    ) -> ConversionRequestBuilder {
        ConversionRequestBuilder {
            source,
            media_kind,
            output_dir: output_dir.into(),
            output_format: output_format.into(),
            image_quality: None,
            scale_percentage: None,
            scale_pixels: None,
            video_preset: None,
        }
    }

    pub fn source(&self) -> &MediaSource {
        &self.source
    }

    pub fn media_kind(&self) -> MediaKind {
        self.media_kind
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn output_format(&self) -> &str {
        &self.output_format
    }

    pub fn image_quality(&self) -> Option<u8> {
        self.image_quality
    }

    pub fn scale(&self) -> &Scale {
        &self.scale
    }

    pub fn video_preset(&self) -> Option<VideoPreset> {
        self.video_preset
    }
}

/// Collects loosely-typed user input and rejects invalid combinations
#[derive(Debug, Clone)]
pub struct ConversionRequestBuilder {
    source: MediaSource,
    media_kind: MediaKind,
    output_dir: PathBuf,
    output_format: String,
    image_quality: Option<u8>,
    scale_percentage: Option<f64>,
    scale_pixels: Option<(Option<i64>, Option<i64>)>,
    video_preset: Option<VideoPreset>,
}

impl ConversionRequestBuilder {
    pub fn image_quality(mut self, quality: u8) -> Self {
        self.image_quality = Some(quality);
        self
    }

    pub fn scale_percentage(mut self, percentage: f64) -> Self {
        self.scale_percentage = Some(percentage);
        self
    }

    /// Pixel dimensions as entered; signed so that zero and negative input
    /// can be reported instead of silently wrapping
    pub fn scale_pixels(mut self, width: Option<i64>, height: Option<i64>) -> Self {
        self.scale_pixels = Some((width, height));
        self
    }

    pub fn video_preset(mut self, preset: VideoPreset) -> Self {
        self.video_preset = Some(preset);
        self
    }

    /// Validate and freeze the request
    pub fn build(self) -> Result<ConversionRequest, DomainError> {
        let output_format = self.output_format.trim().trim_start_matches('.').to_string();
        if output_format.is_empty() {
            return Err(DomainError::Validation(
                "Output format cannot be empty".to_string(),
            ));
        }
        if !output_format.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DomainError::Validation(format!(
                "Output format '{}' must be a plain file extension",
                output_format
            )));
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(DomainError::Validation(
                "Please select an output directory".to_string(),
            ));
        }

        if let MediaSource::Remote(url) = &self.source {
            if url.trim().is_empty() {
                return Err(DomainError::Validation("URL cannot be empty".to_string()));
            }
        }

        if let Some(quality) = self.image_quality {
            if !(1..=100).contains(&quality) {
                return Err(DomainError::Validation(format!(
                    "Image quality must be between 1 and 100, got {}",
                    quality
                )));
            }
        }

        let scale = match (self.scale_percentage, self.scale_pixels) {
            (Some(_), Some(_)) => {
                return Err(DomainError::Validation(
                    "Choose either percentage or pixel scaling, not both".to_string(),
                ))
            }
            (Some(percentage), None) => {
                if !percentage.is_finite()
                    || percentage <= 0.0
                    || percentage > MAX_SCALE_PERCENTAGE
                {
                    return Err(DomainError::Validation(format!(
                        "Percentage must be between 0 and {}, got {}",
                        MAX_SCALE_PERCENTAGE, percentage
                    )));
                }
                Scale::Percentage(percentage)
            }
            (None, Some((width, height))) => {
                if width.is_none() && height.is_none() {
                    return Err(DomainError::Validation(
                        "Enter a width or a height for pixel scaling".to_string(),
                    ));
                }
                Scale::Pixels {
                    width: positive_dimension("width", width)?,
                    height: positive_dimension("height", height)?,
                }
            }
            (None, None) => Scale::None,
        };

        Ok(ConversionRequest {
            source: self.source,
            media_kind: self.media_kind,
            output_dir: self.output_dir,
            output_format,
            image_quality: self.image_quality,
            scale,
            video_preset: self.video_preset,
        })
    }
}

fn positive_dimension(name: &str, value: Option<i64>) -> Result<Option<u32>, DomainError> {
    match value {
        None => Ok(None),
        Some(v) if v > 0 && v <= u32::MAX as i64 => Ok(Some(v as u32)),
        Some(v) => Err(DomainError::Validation(format!(
            "Pixel {} must be a positive integer, got {}",
            name, v
        ))),
    }
}

/// Fetch strategy chosen for a remote source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FetchStrategy {
    /// Plain HTTP GET of an image file
    DirectImage,
    /// Hand the URL to the external downloader
    Delegated,
}

impl fmt::Display for FetchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStrategy::DirectImage => f.write_str("direct-image"),
            FetchStrategy::Delegated => f.write_str("delegated"),
        }
    }
}

/// Running totals of a streamed download
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransferProgress {
    pub total_bytes: Option<u64>,
    pub downloaded_bytes: u64,
}

const UNAVAILABLE: &str = "N/A";
const MIB: f64 = 1024.0 * 1024.0;

impl TransferProgress {
    pub fn new(total_bytes: Option<u64>, downloaded_bytes: u64) -> Self {
        Self {
            total_bytes: total_bytes.filter(|total| *total > 0),
            downloaded_bytes,
        }
    }

    pub fn status(&self) -> &'static str {
        "downloading"
    }

    /// Completion percentage when the total size is known
    pub fn percent(&self) -> Option<f64> {
        self.total_bytes
            .map(|total| self.downloaded_bytes as f64 / total as f64 * 100.0)
    }

    pub fn percent_str(&self) -> String {
        match self.percent() {
            Some(percent) => format!("{:.1}%", percent),
            None => format!("{}%", UNAVAILABLE),
        }
    }

    pub fn downloaded_str(&self) -> String {
        if self.downloaded_bytes == 0 {
            "0 MiB".to_string()
        } else {
            format!("{:.2} MiB", self.downloaded_bytes as f64 / MIB)
        }
    }

    pub fn total_str(&self) -> String {
        match self.total_bytes {
            Some(total) => format!("{:.2} MiB", total as f64 / MIB),
            None => format!("{} MiB", UNAVAILABLE),
        }
    }

    /// Not measured for direct downloads
    pub fn speed_str(&self) -> String {
        UNAVAILABLE.to_string()
    }

    /// Not measured for direct downloads
    pub fn eta_str(&self) -> String {
        UNAVAILABLE.to_string()
    }

    /// Full record in the shape progress consumers expect
    pub fn to_record(&self) -> serde_json::Value {
        serde_json::json!({
            "status": self.status(),
            "total_bytes": self.total_bytes.unwrap_or(0),
            "downloaded_bytes": self.downloaded_bytes,
            "percent_str": self.percent_str(),
            "downloaded_str": self.downloaded_str(),
            "total_str": self.total_str(),
            "speed_str": self.speed_str(),
            "eta_str": self.eta_str(),
        })
    }
}

impl fmt::Display for TransferProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} ({})",
            self.downloaded_str(),
            self.total_str(),
            self.percent_str()
        )
    }
}

/// Event emitted by the pipeline while it works
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// Free-form status note
    TextNote { message: String },
    /// Byte counters of a running download
    Transfer(TransferProgress),
}

impl ProgressEvent {
    pub fn note(message: impl Into<String>) -> Self {
        ProgressEvent::TextNote {
            message: message.into(),
        }
    }
}

/// Final user-facing result of one pipeline invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionOutcome {
    pub ok: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
}

impl ConversionOutcome {
    pub fn success(output_path: PathBuf) -> Self {
        Self {
            ok: true,
            message: format!("Conversion complete! Output: {}", output_path.display()),
            output_path: Some(output_path),
            error_kind: None,
        }
    }

    pub fn failure(message: String, error: &DomainError) -> Self {
        Self {
            ok: false,
            message,
            output_path: None,
            error_kind: Some(error.kind().to_string()),
        }
    }
}
