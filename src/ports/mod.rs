// Ports - Interface definitions (contracts)

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::planner::TranscodePlan;

/// Observer capability for pipeline progress. Called from the invocation's
/// own task; implementations marshal to their own thread if they need to.
pub trait ProgressPort: Send + Sync {
    /// Receive one progress event
    fn emit(&self, event: ProgressEvent);

    /// Convenience for free-form notes
    fn note(&self, message: &str) {
        self.emit(ProgressEvent::note(message));
    }
}

/// Port for plain HTTP downloads of direct image links
#[async_trait]
pub trait DirectFetchPort: Send + Sync {
    /// Stream `url` into `dest_dir` and return the written file
    async fn fetch_direct(
        &self,
        url: &str,
        dest_dir: &Path,
        progress: &dyn ProgressPort,
    ) -> Result<PathBuf, DomainError>;
}

/// Port for downloads delegated to an external downloader tool
#[async_trait]
pub trait DelegatedFetchPort: Send + Sync {
    /// Let the downloader resolve `url` into a file under `dest_dir`
    async fn fetch_delegated(
        &self,
        url: &str,
        dest_dir: &Path,
        kind: MediaKind,
        progress: &dyn ProgressPort,
    ) -> Result<PathBuf, DomainError>;
}

/// Port for running the external transcoder
#[async_trait]
pub trait TranscodePort: Send + Sync {
    /// Execute `plan` and return the output path on success
    async fn invoke(
        &self,
        plan: &TranscodePlan,
        progress: &dyn ProgressPort,
    ) -> Result<PathBuf, DomainError>;
}

/// Availability of an external tool
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ToolStatus {
    pub name: String,
    pub program: String,
    pub available: bool,
    pub version: Option<String>,
}
