//! Direct HTTP fetch adapter
//!
//! Streams a remote image into the workspace chunk by chunk, reporting
//! running byte totals after every chunk.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::DownloadNaming;
use crate::ports::*;

/// Connect and per-read timeout used when none is configured
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// reqwest-based implementation of [`DirectFetchPort`]
pub struct HttpFetchAdapter {
    client: Client,
    read_timeout: Duration,
}

impl HttpFetchAdapter {
    /// Create new HTTP fetch adapter with the given connect/read timeout
    pub fn new(read_timeout: Duration) -> Result<Self, DomainError> {
        let client = Client::builder()
            .connect_timeout(read_timeout)
            .user_agent(concat!("mediaconv/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DomainError::Network {
                url: String::new(),
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            read_timeout,
        })
    }

    fn network_error(url: &str, message: impl Into<String>) -> DomainError {
        DomainError::Network {
            url: url.to_string(),
            message: message.into(),
        }
    }

    fn timed_out(&self, url: &str) -> DomainError {
        Self::network_error(
            url,
            format!("timed out after {}s", self.read_timeout.as_secs_f64()),
        )
    }
}

#[async_trait]
impl DirectFetchPort for HttpFetchAdapter {
    async fn fetch_direct(
        &self,
        url: &str,
        dest_dir: &Path,
        progress: &dyn ProgressPort,
    ) -> Result<PathBuf, DomainError> {
        let mut response = timeout(self.read_timeout, self.client.get(url).send())
            .await
            .map_err(|_| self.timed_out(url))?
            .map_err(|e| Self::network_error(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::network_error(
                url,
                format!(
                    "HTTP {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            ));
        }

        let filename = DownloadNaming::filename_from_url(url).unwrap_or_else(|| {
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .unwrap_or("");
            DownloadNaming::synthesized_name(DownloadNaming::extension_for_content_type(
                content_type,
            ))
        });
        let file_path = dest_dir.join(&filename);
        let total_bytes = response.content_length();
        debug!(url, path = %file_path.display(), ?total_bytes, "Streaming direct download");

        let mut file = File::create(&file_path)
            .await
            .map_err(|e| DomainError::io(&file_path, &e))?;

        let mut downloaded: u64 = 0;
        loop {
            let chunk = timeout(self.read_timeout, response.chunk())
                .await
                .map_err(|_| self.timed_out(url))?
                .map_err(|e| Self::network_error(url, e.to_string()))?;

            let Some(chunk) = chunk else { break };
            if chunk.is_empty() {
                continue;
            }

            file.write_all(&chunk)
                .await
                .map_err(|e| DomainError::io(&file_path, &e))?;
            downloaded += chunk.len() as u64;
            progress.emit(ProgressEvent::Transfer(TransferProgress::new(
                total_bytes,
                downloaded,
            )));
        }

        file.flush()
            .await
            .map_err(|e| DomainError::io(&file_path, &e))?;

        info!(path = %file_path.display(), bytes = downloaded, "Direct download finished");
        progress.note(&format!("Download successful: {}", file_path.display()));
        Ok(file_path)
    }
}
