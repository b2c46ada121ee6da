use std::sync::Arc;
use std::time::Duration;

use crate::adapters::{FFmpegAdapter, HttpFetchAdapter, Settings, YtDlpAdapter};
use crate::app::{convert_interactor::ConvertInteractor, tools_interactor::ToolsInteractor};
use crate::domain::errors::DomainError;
use crate::planner::CommandBuilder;
use crate::ports::{DelegatedFetchPort, DirectFetchPort, TranscodePort};

pub trait AppContainer: Send + Sync {
    fn convert_interactor(&self) -> Arc<ConvertInteractor>;
    fn tools_interactor(&self) -> Arc<ToolsInteractor>;
}

/// Wires the production adapters from resolved settings
pub struct DefaultAppContainer {
    convert_interactor: Arc<ConvertInteractor>,
    tools_interactor: Arc<ToolsInteractor>,
}

impl DefaultAppContainer {
    pub fn new(settings: &Settings) -> Result<Self, DomainError> {
        settings.validate()?;

        let direct_port = Arc::new(HttpFetchAdapter::new(Duration::from_secs(
            settings.http_timeout_secs,
        ))?);
        let delegated_port = Arc::new(YtDlpAdapter::new(settings.ytdlp_path.clone()));
        let transcode_port = Arc::new(
            FFmpegAdapter::new(settings.ffmpeg_path.clone())
                .with_verbose_output(settings.show_verbose_ffmpeg_output),
        );

        let convert_interactor = Arc::new(
            ConvertInteractor::new(
                direct_port as Arc<dyn DirectFetchPort>,
                delegated_port as Arc<dyn DelegatedFetchPort>,
                transcode_port as Arc<dyn TranscodePort>,
                CommandBuilder::new().with_overwrite(settings.overwrite),
            )
            .with_workspace_root(settings.temp_directory.clone()),
        );

        let tools_interactor = Arc::new(ToolsInteractor::new(
            settings.ffmpeg_path.clone(),
            settings.ytdlp_path.clone(),
        ));

        Ok(Self {
            convert_interactor,
            tools_interactor,
        })
    }
}

impl AppContainer for DefaultAppContainer {
    fn convert_interactor(&self) -> Arc<ConvertInteractor> {
        Arc::clone(&self.convert_interactor)
    }

    fn tools_interactor(&self) -> Arc<ToolsInteractor> {
        Arc::clone(&self.tools_interactor)
    }
}
