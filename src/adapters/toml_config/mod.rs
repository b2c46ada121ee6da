// TOML config adapter - Persisted user settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::adapters::fetch_http::DEFAULT_HTTP_TIMEOUT;
use crate::domain::errors::*;

/// Application settings. Loaded once at startup and passed explicitly to
/// whoever needs them; the pipeline never touches the store itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Output directory used when a command does not name one
    pub default_output_directory: PathBuf,
    /// Transcoder binary
    pub ffmpeg_path: String,
    /// Downloader binary
    pub ytdlp_path: String,
    /// Connect/read timeout for direct downloads, in seconds
    pub http_timeout_secs: u64,
    /// Parent directory for download workspaces (system temp dir if unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_directory: Option<PathBuf>,
    /// Replace existing output files
    pub overwrite: bool,
    /// Forward ffmpeg's log output as progress notes
    pub show_verbose_ffmpeg_output: bool,
    /// Default log filter
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_output_directory: dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("ConvertedMedia"),
            ffmpeg_path: "ffmpeg".to_string(),
            ytdlp_path: "yt-dlp".to_string(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT.as_secs(),
            temp_directory: None,
            overwrite: false,
            show_verbose_ffmpeg_output: false,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.http_timeout_secs == 0 {
            return Err(DomainError::Validation(
                "http_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.ffmpeg_path.trim().is_empty() || self.ytdlp_path.trim().is_empty() {
            return Err(DomainError::Validation(
                "Tool paths cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Where loaded settings came from
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsSource {
    /// Parsed from the existing file
    File,
    /// File was missing; defaults were written
    Initialized,
    /// File could not be parsed; defaults are used in memory
    Fallback(String),
}

/// TOML configuration adapter
pub struct TomlConfigAdapter {
    path: PathBuf,
}

impl TomlConfigAdapter {
    /// Adapter for an explicit settings file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Adapter for the per-user settings file
    pub fn at_default_location() -> Self {
        Self::new(Self::default_config_path())
    }

    /// `<config dir>/mediaconv/settings.toml`, or the working directory
    pub fn default_config_path() -> PathBuf {
        match dirs::config_dir() {
            Some(dir) => dir.join("mediaconv").join("settings.toml"),
            None => PathBuf::from("mediaconv_settings.toml"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings; a missing file is created with defaults and a corrupt
    /// one is reported and replaced by defaults in memory only
    pub fn load_or_init(&self) -> Result<Settings, DomainError> {
        self.load_with_source().map(|(settings, _)| settings)
    }

    /// Like `load_or_init`, also telling where the values came from
    pub fn load_with_source(&self) -> Result<(Settings, SettingsSource), DomainError> {
        if !self.path.exists() {
            let settings = Settings::default();
            info!(path = %self.path.display(), "Settings file not found, writing defaults");
            if let Err(e) = self.save(&settings) {
                warn!(error = %e, "Could not write default settings");
            }
            return Ok((settings, SettingsSource::Initialized));
        }

        let content =
            std::fs::read_to_string(&self.path).map_err(|e| DomainError::io(&self.path, &e))?;

        match Self::deserialize(&content) {
            Ok(settings) => Ok((settings, SettingsSource::File)),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Error reading settings, using defaults"
                );
                Ok((Settings::default(), SettingsSource::Fallback(e.to_string())))
            }
        }
    }

    /// Write settings, creating the parent directory when needed
    pub fn save(&self, settings: &Settings) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| DomainError::directory(parent, &e))?;
            }
        }

        let content = Self::serialize(settings)?;
        std::fs::write(&self.path, content).map_err(|e| DomainError::io(&self.path, &e))?;
        Ok(())
    }

    /// Serialize settings to a TOML string
    pub fn serialize(settings: &Settings) -> Result<String, DomainError> {
        toml::to_string_pretty(settings)
            .map_err(|e| DomainError::Validation(format!("Failed to serialize settings: {}", e)))
    }

    /// Deserialize settings from a TOML string; absent keys take defaults
    pub fn deserialize(content: &str) -> Result<Settings, DomainError> {
        toml::from_str(content)
            .map_err(|e| DomainError::Validation(format!("Failed to parse TOML config: {}", e)))
    }
}
