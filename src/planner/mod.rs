//! Transcode planning: turns a conversion request into an ffmpeg invocation

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::model::{ConversionRequest, Scale};
use crate::domain::rules::ImageQualityMapper;

/// Fully resolved transcoder invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscodePlan {
    /// Input file handed to `-i`
    pub input_path: PathBuf,
    /// Where the transcoder writes its result
    pub output_path: PathBuf,
    /// Directory that must exist before the tool runs
    pub output_dir: PathBuf,
    /// Filter chain fragments in the order they were added
    pub filters: Vec<String>,
    /// Argument list, excluding the program name
    pub args: Vec<String>,
}

impl TranscodePlan {
    /// Arguments as `OsString`s for process spawning
    pub fn os_args(&self) -> Vec<OsString> {
        self.args.iter().map(OsString::from).collect()
    }

    /// Printable command line
    pub fn command_line(&self, program: &str) -> String {
        let mut line = String::from(program);
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Deterministic builder for transcoder arguments
#[derive(Debug, Clone, Default)]
pub struct CommandBuilder {
    overwrite: bool,
}

impl CommandBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pass `-y` so an existing output file gets replaced
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// `output_dir/<input stem>.<output_format>`
    pub fn output_path_for(input_path: &Path, request: &ConversionRequest) -> PathBuf {
        let stem = input_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| "output".to_string());
        request
            .output_dir()
            .join(format!("{}.{}", stem, request.output_format()))
    }

    /// Build the argument list for converting `input_path` per `request`
    pub fn build(&self, input_path: &Path, request: &ConversionRequest) -> TranscodePlan {
        let output_path = Self::output_path_for(input_path, request);

        let mut filters = Vec::new();
        let mut output_options: Vec<String> = Vec::new();

        match request.scale() {
            Scale::None => {}
            Scale::Percentage(percentage) => {
                let factor = percentage / 100.0;
                filters.push(format!("scale=iw*{}:ih*{}", factor, factor));
            }
            Scale::Pixels { width, height } => {
                filters.push(format!(
                    "scale={}:{}",
                    dimension_arg(*width),
                    dimension_arg(*height)
                ));
            }
        }

        if let Some(quality) = request.image_quality() {
            if let Some(value) = ImageQualityMapper::quality_flag(request.output_format(), quality)
            {
                output_options.push("-q:v".to_string());
                output_options.push(value);
            }
        }

        // Preset scaling is appended after any explicit scale; both stay in the chain
        if let Some(preset) = request.video_preset() {
            if let Some((width, height)) = preset.resolution() {
                filters.push(format!("scale={}:{}", width, height));
            }
            let (crf, encoder_preset) = preset.encoder_settings();
            output_options.push("-crf".to_string());
            output_options.push(crf.to_string());
            output_options.push("-preset".to_string());
            output_options.push(encoder_preset.to_string());
        }

        let mut args = vec![
            "-i".to_string(),
            input_path.to_string_lossy().to_string(),
        ];
        if !filters.is_empty() {
            args.push("-vf".to_string());
            args.push(filters.join(","));
        }
        args.extend(output_options);
        if self.overwrite {
            args.push("-y".to_string());
        }
        args.push(output_path.to_string_lossy().to_string());

        TranscodePlan {
            input_path: input_path.to_path_buf(),
            output_path,
            output_dir: request.output_dir().to_path_buf(),
            filters,
            args,
        }
    }
}

fn dimension_arg(value: Option<u32>) -> String {
    value.map_or_else(|| "-1".to_string(), |v| v.to_string())
}
