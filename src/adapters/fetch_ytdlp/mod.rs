//! yt-dlp delegated fetch adapter
//!
//! The downloader's log is the only source for the produced file name, so
//! path recovery lives here behind [`DelegatedFetchPort`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::DestinationParser;
use crate::ports::*;
use crate::utils::path::PathUtils;
use crate::utils::process::run_captured;

/// Tool label used in messages
pub const YTDLP_TOOL: &str = "yt-dlp";

/// Output template relative to the destination directory
pub const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Format selector preferring an mp4/m4a pair
pub const VIDEO_FORMAT: &str = "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best";

/// yt-dlp-based implementation of [`DelegatedFetchPort`]
pub struct YtDlpAdapter {
    program: String,
}

impl YtDlpAdapter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Arguments for downloading `url` into `dest_dir` as `kind`
    pub fn build_args(url: &str, dest_dir: &Path, kind: MediaKind) -> Vec<String> {
        let mut args = vec![
            url.to_string(),
            "-o".to_string(),
            dest_dir.join(OUTPUT_TEMPLATE).to_string_lossy().to_string(),
            "--no-playlist".to_string(),
            "--restrict-filenames".to_string(),
            "--no-warnings".to_string(),
        ];

        match kind {
            MediaKind::Video => {
                args.extend(["--format".to_string(), VIDEO_FORMAT.to_string()]);
            }
            MediaKind::Audio => {
                args.extend(
                    ["--extract-audio", "--audio-format", "mp3", "--audio-quality", "0"]
                        .map(String::from),
                );
            }
            MediaKind::Image => {
                args.extend(["--format".to_string(), "best".to_string()]);
            }
        }

        args
    }

    /// Locate the downloaded file from captured output
    pub fn resolve_download(
        stdout: &str,
        stderr: &str,
        dest_dir: &Path,
        kind: MediaKind,
    ) -> Result<PathBuf, DomainError> {
        let output = format!("{}\n{}", stdout, stderr);

        let candidate = DestinationParser::find_destination(stdout, stderr, kind).ok_or_else(|| {
            DomainError::PathResolution {
                message: "Could not determine downloaded file path from yt-dlp output".to_string(),
                output: output.clone(),
            }
        })?;
        debug!(candidate = %candidate, "Parsed downloader destination");

        let resolved = PathUtils::resolve_reported_path(&candidate, dest_dir);
        if PathUtils::is_existing_file(&resolved) {
            Ok(resolved)
        } else {
            warn!(path = %resolved.display(), "Reported download is missing on disk");
            Err(DomainError::PathResolution {
                message: format!(
                    "Download completed, but could not verify downloaded file at path: {}",
                    resolved.display()
                ),
                output,
            })
        }
    }
}

#[async_trait]
impl DelegatedFetchPort for YtDlpAdapter {
    async fn fetch_delegated(
        &self,
        url: &str,
        dest_dir: &Path,
        kind: MediaKind,
        progress: &dyn ProgressPort,
    ) -> Result<PathBuf, DomainError> {
        let args = Self::build_args(url, dest_dir, kind);
        info!(url, kind = %kind, "Running delegated download");

        let output = run_captured(YTDLP_TOOL, &self.program, &args)
            .await?
            .into_success(YTDLP_TOOL)?;

        let path = Self::resolve_download(&output.stdout, &output.stderr, dest_dir, kind)?;
        progress.note(&format!("Download successful: {}", path.display()));
        Ok(path)
    }
}
