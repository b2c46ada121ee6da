// Tools interactor - Reports availability of the external tools

use tracing::debug;

use crate::adapters::exec_ffmpeg::FFMPEG_TOOL;
use crate::adapters::fetch_ytdlp::YTDLP_TOOL;
use crate::ports::ToolStatus;
use crate::utils::process::probe_version;

/// One external tool and how to ask it for its version
#[derive(Debug, Clone)]
struct ToolProbe {
    name: &'static str,
    program: String,
    version_arg: &'static str,
}

/// Interactor for tool discovery
pub struct ToolsInteractor {
    probes: Vec<ToolProbe>,
}

impl ToolsInteractor {
    pub fn new(ffmpeg_program: impl Into<String>, ytdlp_program: impl Into<String>) -> Self {
        Self {
            probes: vec![
                ToolProbe {
                    name: FFMPEG_TOOL,
                    program: ffmpeg_program.into(),
                    version_arg: "-version",
                },
                ToolProbe {
                    name: YTDLP_TOOL,
                    program: ytdlp_program.into(),
                    version_arg: "--version",
                },
            ],
        }
    }

    /// Probe every tool in turn
    pub async fn check(&self) -> Vec<ToolStatus> {
        let mut statuses = Vec::with_capacity(self.probes.len());
        for probe in &self.probes {
            let version = probe_version(&probe.program, probe.version_arg).await;
            debug!(
                tool = probe.name,
                program = %probe.program,
                found = version.is_some(),
                "Probed tool"
            );
            statuses.push(ToolStatus {
                name: probe.name.to_string(),
                program: probe.program.clone(),
                available: version.is_some(),
                version,
            });
        }
        statuses
    }
}
