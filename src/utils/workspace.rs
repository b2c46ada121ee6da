//! Scoped temporary directories for staging downloads

use std::future::Future;
use std::path::{Path, PathBuf};

use tempfile::{Builder, TempDir};
use tracing::{debug, warn};

use crate::domain::errors::DomainError;

/// Prefix used for pipeline workspaces
pub const WORKSPACE_PREFIX: &str = "media_converter_download_";

/// An owned temporary directory, removed recursively when closed or dropped
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a uniquely named directory under `root`, or the system temp dir
    pub fn create(prefix: &str, root: Option<&Path>) -> Result<Self, DomainError> {
        let mut builder = Builder::new();
        builder.prefix(prefix);
        let result = match root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        };
        let dir = result.map_err(|e| {
            DomainError::directory(
                root.map(Path::to_path_buf).unwrap_or_else(std::env::temp_dir),
                &e,
            )
        })?;
        debug!(path = %dir.path().display(), "Created workspace");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the directory now and report failures
    pub fn close(self) -> std::io::Result<()> {
        let path = self.dir.path().to_path_buf();
        let result = self.dir.close();
        if result.is_ok() {
            debug!(path = %path.display(), "Removed workspace");
        }
        result
    }
}

/// Run `body` inside a fresh workspace and remove the workspace afterwards,
/// whatever `body` returned. Cleanup failures are logged, never masked onto
/// the body's result.
pub async fn with_workspace<T, F, Fut>(
    prefix: &str,
    root: Option<&Path>,
    body: F,
) -> Result<T, DomainError>
where
    F: FnOnce(PathBuf) -> Fut,
    Fut: Future<Output = Result<T, DomainError>>,
{
    let workspace = Workspace::create(prefix, root)?;
    let path = workspace.path().to_path_buf();

    let result = body(path.clone()).await;

    if let Err(e) = workspace.close() {
        warn!(path = %path.display(), error = %e, "Error cleaning up temporary files");
    }
    result
}
