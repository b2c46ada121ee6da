//! FFmpeg execution adapter
//!
//! Runs the `ffmpeg` binary as a subprocess. The exit status is the only
//! structured signal; the planned output path is trusted on success.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::errors::*;
use crate::planner::TranscodePlan;
use crate::ports::*;
use crate::utils::path::PathUtils;
use crate::utils::process::run_captured;

/// Tool label used in messages
pub const FFMPEG_TOOL: &str = "ffmpeg";

/// FFmpeg-based implementation of [`TranscodePort`]
pub struct FFmpegAdapter {
    program: String,
    verbose: bool,
}

impl FFmpegAdapter {
    /// Create new FFmpeg adapter for the given binary
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            verbose: false,
        }
    }

    /// Forward ffmpeg's own log as progress notes after a successful run
    pub fn with_verbose_output(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

#[async_trait]
impl TranscodePort for FFmpegAdapter {
    async fn invoke(
        &self,
        plan: &TranscodePlan,
        progress: &dyn ProgressPort,
    ) -> Result<PathBuf, DomainError> {
        let created = PathUtils::ensure_directory(&plan.output_dir)
            .map_err(|e| DomainError::directory(&plan.output_dir, &e))?;
        if created {
            progress.note(&format!(
                "Created output directory: {}",
                plan.output_dir.display()
            ));
        }

        progress.note(&format!(
            "Attempting to convert '{}' to '{}'...",
            plan.input_path.display(),
            plan.output_path.display()
        ));
        progress.note(&format!("FFmpeg command: {}", plan.command_line(FFMPEG_TOOL)));

        let output = run_captured(FFMPEG_TOOL, &self.program, plan.os_args())
            .await
            .and_then(|output| output.into_success(FFMPEG_TOOL))
            .map_err(|e| {
                warn!(error_kind = e.kind(), "FFmpeg run failed");
                e
            })?;

        if self.verbose && !output.stderr.trim().is_empty() {
            progress.note(output.stderr.trim_end());
        }

        info!(output = %plan.output_path.display(), "Conversion finished");
        progress.note("Conversion successful!");
        Ok(plan.output_path.clone())
    }
}
