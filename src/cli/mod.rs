//! CLI module for mediaconv
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::utils::logging::LogFormat;

pub mod args;
pub mod commands;

pub use args::{ClassifyArgs, ConvertArgs, SettingsCommand, ToolsArgs};

/// mediaconv
///
/// Converts local media files, or media fetched from a URL, to another
/// format using FFmpeg. Page URLs are downloaded with yt-dlp.
#[derive(Parser, Debug)]
#[command(name = "mediaconv")]
#[command(about = "Fetch media from files or URLs and convert it with FFmpeg")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (takes precedence over RUST_LOG and the settings file)
    #[arg(long, global = true, env = "MEDIACONV_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, global = true, default_value = "pretty", value_parser = parse_log_format)]
    pub log_format: LogFormat,

    /// Settings file (default: per-user config directory)
    #[arg(long, global = true, env = "MEDIACONV_CONFIG")]
    pub config: Option<PathBuf>,

    /// Replace existing output files
    #[arg(long, global = true)]
    pub overwrite: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a local file or a URL
    Convert(args::ConvertArgs),
    /// Show how a URL would be fetched
    Classify(args::ClassifyArgs),
    /// Check that ffmpeg and yt-dlp are available
    Tools(args::ToolsArgs),
    /// Show or change persisted settings
    Settings {
        #[command(subcommand)]
        action: args::SettingsCommand,
    },
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    LogFormat::parse(value).map_err(|e| e.to_string())
}
