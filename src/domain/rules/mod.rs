// Domain rules - Pure decisions of the acquisition pipeline

use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Url;

use crate::domain::model::*;

/// Path suffixes that mark a URL as a plain image file
pub const DIRECT_IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".bmp", ".webp"];

/// Substrings of redirect pages that merely wrap the real target URL
pub const REDIRECTOR_MARKERS: &[&str] = &["google.com/url", "?url=", "&url="];

/// Longest extension accepted when reusing the URL basename as file name
pub const MAX_EXTENSION_LEN: usize = 5;

/// Decides how a remote URL gets fetched
pub struct SourceClassifier;

impl SourceClassifier {
    /// Classify a URL by syntax alone. The result only depends on the string:
    /// image pages behind opaque redirects end up delegated, which is accepted.
    pub fn classify(url: &str) -> FetchStrategy {
        let lowered = url.to_lowercase();
        if REDIRECTOR_MARKERS.iter().any(|marker| lowered.contains(marker)) {
            return FetchStrategy::Delegated;
        }

        let path = match Url::parse(url.trim()) {
            Ok(parsed) => parsed.path().to_lowercase(),
            Err(_) => return FetchStrategy::Delegated,
        };

        if DIRECT_IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
            FetchStrategy::DirectImage
        } else {
            FetchStrategy::Delegated
        }
    }
}

/// Maps the user-facing 1..=100 image quality onto encoder values
pub struct ImageQualityMapper;

impl ImageQualityMapper {
    pub const JPEG_BEST: u32 = 2;
    pub const JPEG_WORST: u32 = 31;

    /// `2 + (100 - q) / 100 * 29`, truncated. The formula tops out at 30 for
    /// q=1, so that endpoint is pinned to the worst qscale.
    pub fn jpeg_qscale(quality: u8) -> u32 {
        let quality = u32::from(quality.clamp(1, 100));
        if quality == 1 {
            return Self::JPEG_WORST;
        }
        Self::JPEG_BEST + (100 - quality) * (Self::JPEG_WORST - Self::JPEG_BEST) / 100
    }

    /// Value for `-q:v`, or `None` when the output format has no quality knob
    pub fn quality_flag(output_format: &str, quality: u8) -> Option<String> {
        match output_format.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::jpeg_qscale(quality).to_string()),
            "webp" => Some(quality.to_string()),
            _ => None,
        }
    }
}

/// File naming for direct downloads
pub struct DownloadNaming;

impl DownloadNaming {
    /// Basename of the URL path when it carries a plausible extension
    pub fn filename_from_url(url: &str) -> Option<String> {
        let parsed = Url::parse(url.trim()).ok()?;
        let basename = parsed.path_segments()?.last()?.to_string();
        let (_, ext) = basename.rsplit_once('.')?;
        if ext.len() > MAX_EXTENSION_LEN {
            return None;
        }
        Some(basename)
    }

    /// Extension (with dot) for a response content-type
    pub fn extension_for_content_type(content_type: &str) -> &'static str {
        let content_type = content_type.to_lowercase();
        if content_type.contains("image/jpeg") {
            ".jpg"
        } else if content_type.contains("image/png") {
            ".png"
        } else if content_type.contains("image/gif") {
            ".gif"
        } else if content_type.contains("image/webp") {
            ".webp"
        } else {
            ".jpg"
        }
    }

    /// `downloaded_image_<8 hex>.<ext>` for URLs without a usable name
    pub fn synthesized_name(extension: &str) -> String {
        let token = uuid::Uuid::new_v4().simple().to_string();
        format!("downloaded_image_{}{}", &token[..8], extension)
    }
}

lazy_static! {
    static ref DESTINATION_RE: Regex =
        Regex::new(r"(?:Destination:|Writing video to:)\s*(.+)$").unwrap();
    static ref MERGER_RE: Regex =
        Regex::new(r#"\[Merger\]\s+Merging formats into\s+"(.+)"\s*$"#).unwrap();
}

/// Recovers the produced file path from the downloader's log text
pub struct DestinationParser;

impl DestinationParser {
    /// First marker line wins, scanning stdout then stderr. `Destination:`
    /// also covers the `[ExtractAudio]` / `[ExtractVideo]` post-processing
    /// lines; video downloads additionally accept the `[Merger]` line.
    pub fn find_destination(stdout: &str, stderr: &str, kind: MediaKind) -> Option<String> {
        stdout.lines().chain(stderr.lines()).find_map(|line| {
            Self::capture(&DESTINATION_RE, line).or_else(|| match kind {
                MediaKind::Video => Self::capture(&MERGER_RE, line),
                _ => None,
            })
        })
    }

    fn capture(re: &Regex, line: &str) -> Option<String> {
        let candidate = re.captures(line.trim_end())?.get(1)?.as_str().trim();
        if candidate.is_empty() {
            None
        } else {
            Some(candidate.to_string())
        }
    }
}

#[cfg(test)]
mod tests;
