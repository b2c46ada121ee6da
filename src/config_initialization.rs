//! Configuration initialization and hierarchy management

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::adapters::{Settings, SettingsSource, TomlConfigAdapter};
use crate::cli::Cli;

/// Settings after every layer has been applied
#[derive(Debug, Clone)]
pub struct ResolvedConfiguration {
    /// Effective settings handed to the pipeline
    pub settings: Settings,
    /// Settings file that was read
    pub config_path: PathBuf,
    /// How the file layer was obtained
    pub source: SettingsSource,
    /// Number of values overridden by the environment
    pub env_overrides: usize,
    /// Number of values overridden on the command line
    pub cli_overrides: usize,
}

impl ResolvedConfiguration {
    /// Report how the configuration was assembled. Called once logging is up.
    pub fn log_summary(&self) {
        info!(
            path = %self.config_path.display(),
            source = ?self.source,
            env_overrides = self.env_overrides,
            cli_overrides = self.cli_overrides,
            "Configuration resolved"
        );
    }
}

/// Adapter for the settings file named by `--config`, or the default location
pub fn config_adapter(cli: &Cli) -> TomlConfigAdapter {
    match &cli.config {
        Some(path) => TomlConfigAdapter::new(path),
        None => TomlConfigAdapter::at_default_location(),
    }
}

/// Initialize configuration hierarchy following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(cli: &Cli) -> Result<ResolvedConfiguration> {
    let adapter = config_adapter(cli);

    // Defaults and file
    let (mut settings, source) = adapter
        .load_with_source()
        .with_context(|| format!("Failed to load settings from {}", adapter.path().display()))?;

    // Environment
    let env_overrides = apply_environment_overrides(&mut settings, |key| std::env::var(key).ok())?;

    // Command line
    let cli_overrides = apply_cli_overrides(&mut settings, cli);

    settings.validate().context("Invalid configuration")?;

    Ok(ResolvedConfiguration {
        settings,
        config_path: adapter.path().to_path_buf(),
        source,
        env_overrides,
        cli_overrides,
    })
}

/// Apply `MEDIACONV_*` variables; `lookup` abstracts the environment
pub fn apply_environment_overrides<F>(settings: &mut Settings, lookup: F) -> Result<usize>
where
    F: Fn(&str) -> Option<String>,
{
    let mut overrides = 0;

    if let Some(value) = lookup("MEDIACONV_OUTPUT_DIR") {
        settings.default_output_directory = PathBuf::from(value);
        overrides += 1;
    }
    if let Some(value) = lookup("MEDIACONV_FFMPEG_PATH") {
        settings.ffmpeg_path = value;
        overrides += 1;
    }
    if let Some(value) = lookup("MEDIACONV_YTDLP_PATH") {
        settings.ytdlp_path = value;
        overrides += 1;
    }
    if let Some(value) = lookup("MEDIACONV_HTTP_TIMEOUT_SECS") {
        settings.http_timeout_secs = value
            .trim()
            .parse()
            .with_context(|| format!("MEDIACONV_HTTP_TIMEOUT_SECS is not a number: {}", value))?;
        overrides += 1;
    }
    if let Some(value) = lookup("MEDIACONV_TEMP_DIR") {
        settings.temp_directory = Some(PathBuf::from(value));
        overrides += 1;
    }
    if let Some(value) = lookup("MEDIACONV_OVERWRITE") {
        settings.overwrite = parse_flag("MEDIACONV_OVERWRITE", &value)?;
        overrides += 1;
    }
    if let Some(value) = lookup("MEDIACONV_VERBOSE_FFMPEG") {
        settings.show_verbose_ffmpeg_output = parse_flag("MEDIACONV_VERBOSE_FFMPEG", &value)?;
        overrides += 1;
    }

    Ok(overrides)
}

/// Apply command-line overrides
pub fn apply_cli_overrides(settings: &mut Settings, cli: &Cli) -> usize {
    let mut overrides = 0;

    if cli.overwrite {
        settings.overwrite = true;
        overrides += 1;
    }
    if let Some(level) = &cli.log_level {
        settings.log_level = level.clone();
        overrides += 1;
    }

    overrides
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(anyhow::anyhow!("{} must be a boolean, got '{}'", name, other)),
    }
}
