//! Command implementations

use anyhow::{Context, Result};
use serde_json::json;
use tracing::{error, info};

use crate::adapters::{
    CallbackProgressAdapter, Settings, TeeProgressAdapter, TomlConfigAdapter, TracingLogAdapter,
};
use crate::app::AppContainer;
use crate::cli::args::{ClassifyArgs, ConvertArgs, SettingsCommand, ToolsArgs};
use crate::domain::model::{ConversionOutcome, ConversionRequest, MediaSource, ProgressEvent};
use crate::domain::rules::SourceClassifier;
use crate::ports::{ProgressPort, ToolStatus};
use crate::utils::Utils;

/// Execute the convert command
pub async fn convert(
    args: ConvertArgs,
    settings: &Settings,
    container: &dyn AppContainer,
) -> Result<()> {
    let request = build_request(&args, settings).context("Invalid conversion request")?;
    info!(
        source = %request.source(),
        kind = %request.media_kind(),
        format = request.output_format(),
        output_dir = %request.output_dir().display(),
        "Starting convert operation"
    );

    // Run on its own task; events arrive here and go to the log sink
    let interactor = container.convert_interactor();
    let (handle, mut events) = interactor.spawn(request);
    let sink = progress_sink(!args.json);
    while let Some(event) = events.recv().await {
        sink.emit(event);
    }
    let outcome = handle.await.context("Conversion task failed to complete")?;

    if args.json {
        let json = serde_json::to_string_pretty(&outcome)
            .context("Failed to serialize outcome to JSON")?;
        println!("{}", json);
    } else {
        display_outcome(&outcome);
    }

    if outcome.ok {
        info!("Convert operation completed successfully");
        Ok(())
    } else {
        error!(error_kind = ?outcome.error_kind, "Convert operation failed");
        Err(anyhow::anyhow!("Conversion did not complete"))
    }
}

/// Execute the classify command
pub fn classify(args: ClassifyArgs) -> Result<()> {
    let strategy = SourceClassifier::classify(&args.url);
    if args.json {
        let json = serde_json::to_string_pretty(&json!({
            "url": args.url,
            "strategy": strategy.to_string(),
        }))
        .context("Failed to serialize classification to JSON")?;
        println!("{}", json);
    } else {
        println!("{}", strategy);
    }
    Ok(())
}

/// Execute the tools command
pub async fn tools(args: ToolsArgs, container: &dyn AppContainer) -> Result<()> {
    let statuses = container.tools_interactor().check().await;

    if args.json {
        let json = serde_json::to_string_pretty(&statuses)
            .context("Failed to serialize tool status to JSON")?;
        println!("{}", json);
    } else {
        display_tool_statuses(&statuses);
    }
    Ok(())
}

/// Execute a settings subcommand
pub fn settings(
    action: SettingsCommand,
    effective: &Settings,
    adapter: &TomlConfigAdapter,
) -> Result<()> {
    match action {
        SettingsCommand::Show { json } => {
            if json {
                let json = serde_json::to_string_pretty(effective)
                    .context("Failed to serialize settings to JSON")?;
                println!("{}", json);
            } else {
                let toml = TomlConfigAdapter::serialize(effective)
                    .context("Failed to serialize settings")?;
                println!("# {}", adapter.path().display());
                print!("{}", toml);
            }
        }
        SettingsCommand::SetOutputDir { dir } => {
            // Start from the file, not the effective values, so env and CLI
            // overrides are not persisted
            let mut stored = adapter
                .load_or_init()
                .context("Failed to load settings")?;
            stored.default_output_directory = dir.clone();
            adapter.save(&stored).with_context(|| {
                format!("Failed to save settings to {}", adapter.path().display())
            })?;
            info!(dir = %dir.display(), "Default output directory updated");
            println!("Default output directory set to: {}", dir.display());
        }
    }
    Ok(())
}

/// Log sink, plus a console byte counter unless output is machine-readable
fn progress_sink(console: bool) -> TeeProgressAdapter {
    let mut sinks: Vec<Box<dyn ProgressPort>> = vec![Box::new(TracingLogAdapter::new())];
    if console {
        sinks.push(Box::new(CallbackProgressAdapter::new(|event| {
            if let ProgressEvent::Transfer(transfer) = event {
                eprintln!("Downloading {}", transfer);
            }
        })));
    }
    TeeProgressAdapter::new(sinks)
}

/// Translate convert arguments into a validated request
fn build_request(args: &ConvertArgs, settings: &Settings) -> Result<ConversionRequest> {
    let source = match (&args.input, &args.url) {
        (Some(path), _) => MediaSource::Local(path.clone()),
        (None, Some(url)) => MediaSource::Remote(url.clone()),
        (None, None) => return Err(anyhow::anyhow!("Either --input or --url is required")),
    };
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| settings.default_output_directory.clone());

    let mut builder =
        ConversionRequest::builder(source, args.kind, output_dir, args.format.as_str());
    if let Some(quality) = args.quality {
        builder = builder.image_quality(quality);
    }
    if let Some(percentage) = args.scale_percent {
        builder = builder.scale_percentage(percentage);
    }
    if args.width.is_some() || args.height.is_some() {
        builder = builder.scale_pixels(args.width, args.height);
    }
    if let Some(preset) = args.preset {
        builder = builder.video_preset(preset);
    }
    Ok(builder.build()?)
}

fn display_outcome(outcome: &ConversionOutcome) {
    println!("{}", outcome.message);
    if let Some(path) = &outcome.output_path {
        if let Ok(metadata) = std::fs::metadata(path) {
            println!("Size: {}", Utils::format_file_size(metadata.len()));
        }
    }
}

fn display_tool_statuses(statuses: &[ToolStatus]) {
    for status in statuses {
        match &status.version {
            Some(version) => println!("{:<8} {:<24} {}", status.name, status.program, version),
            None => println!("{:<8} {:<24} not found", status.name, status.program),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::domain::model::Scale;
    use clap::Parser;
    use std::path::PathBuf;

    fn convert_args(extra: &[&str]) -> ConvertArgs {
        let mut argv = vec!["mediaconv", "convert"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Convert(args) => args,
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_output_dir_defaults_to_settings() {
        let settings = Settings {
            default_output_directory: PathBuf::from("/home/me/ConvertedMedia"),
            ..Settings::default()
        };
        let args = convert_args(&[
            "--input",
            "clip.mov",
            "--kind",
            "video",
            "--format",
            ".mp4",
        ]);
        let request = build_request(&args, &settings).unwrap();
        assert_eq!(request.output_dir(), PathBuf::from("/home/me/ConvertedMedia").as_path());
        assert_eq!(request.output_format(), "mp4");
    }

    #[test]
    fn test_single_dimension_keeps_other_unset() {
        let args = convert_args(&[
            "--url",
            "https://x.test/a.png",
            "--kind",
            "image",
            "--format",
            "png",
            "--width",
            "640",
        ]);
        let request = build_request(&args, &Settings::default()).unwrap();
        assert_eq!(
            request.scale(),
            &Scale::Pixels {
                width: Some(640),
                height: None
            }
        );
    }

    #[test]
    fn test_conflicting_scale_modes_are_rejected() {
        let args = convert_args(&[
            "--input",
            "a.png",
            "--kind",
            "image",
            "--format",
            "png",
            "--scale-percent",
            "50",
            "--height",
            "100",
        ]);
        assert!(build_request(&args, &Settings::default()).is_err());
    }

    #[test]
    fn test_negative_width_is_rejected() {
        let args = convert_args(&[
            "--input",
            "a.png",
            "--kind",
            "image",
            "--format",
            "png",
            "--width",
            "-5",
        ]);
        assert!(build_request(&args, &Settings::default()).is_err());
    }
}
