//! Path helpers for locating files produced by external tools

use std::path::{Path, PathBuf};

/// Path utilities
pub struct PathUtils;

impl PathUtils {
    /// Resolve a path reported by a tool. Relative candidates are looked up
    /// in `base_dir` by basename; when nothing is there the candidate is
    /// returned unchanged for the caller to verify.
    pub fn resolve_reported_path(candidate: &str, base_dir: &Path) -> PathBuf {
        let candidate_path = PathBuf::from(candidate);
        if candidate_path.is_absolute() {
            return candidate_path;
        }

        if let Some(name) = candidate_path.file_name() {
            let rebased = base_dir.join(name);
            if rebased.exists() {
                return rebased;
            }
        }

        candidate_path
    }

    /// Whether `path` names an existing regular file
    pub fn is_existing_file(path: &Path) -> bool {
        path.is_file()
    }

    /// Create `dir` and its parents
    pub fn ensure_directory(dir: &Path) -> std::io::Result<bool> {
        if dir.is_dir() {
            return Ok(false);
        }
        std::fs::create_dir_all(dir)?;
        Ok(true)
    }
}
