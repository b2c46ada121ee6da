//! mediaconv
//!
//! Converts media files with FFmpeg. Sources are local files or URLs; direct
//! image links are downloaded over HTTP and everything else goes through
//! yt-dlp into a temporary workspace that is removed afterwards.
//!
//! # Usage
//!
//! ```bash
//! mediaconv convert --input photo.HEIC --kind image --format jpg --quality 80
//! mediaconv convert --url "https://www.youtube.com/watch?v=..." --kind audio --format mp3
//! mediaconv classify "https://example.com/cat.png"
//! mediaconv tools
//! mediaconv settings set-output-dir ~/Videos/Converted
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use mediaconv_cli::app::DefaultAppContainer;
use mediaconv_cli::cli::{commands, Cli, Commands};
use mediaconv_cli::config_initialization::{config_adapter, initialize_configuration_hierarchy};
use mediaconv_cli::utils::logging::{init_logging, LoggingConfig};

/// Main entry point for the mediaconv CLI application
#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Settings are resolved before logging so the file's log level applies
    let resolved = initialize_configuration_hierarchy(&cli)?;

    init_logging(&LoggingConfig {
        level_override: cli.log_level.clone(),
        default_level: resolved.settings.log_level.clone(),
        format: cli.log_format,
    });
    resolved.log_summary();

    let settings = resolved.settings;
    let adapter = config_adapter(&cli);

    // Execute the requested command
    match cli.command {
        Commands::Convert(args) => {
            info!("Executing convert command");
            let container =
                DefaultAppContainer::new(&settings).context("Failed to initialize pipeline")?;
            commands::convert(args, &settings, &container).await?;
        }
        Commands::Classify(args) => {
            commands::classify(args)?;
        }
        Commands::Tools(args) => {
            info!("Executing tools command");
            let container =
                DefaultAppContainer::new(&settings).context("Failed to initialize pipeline")?;
            commands::tools(args, &container).await?;
        }
        Commands::Settings { action } => {
            commands::settings(action, &settings, &adapter)?;
        }
    }

    Ok(())
}
