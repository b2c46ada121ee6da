// Domain errors - Error types for the domain layer

use std::path::PathBuf;
use thiserror::Error;

/// Failure kinds produced by the acquisition and transcode pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Malformed request parameters, rejected before any I/O
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Output or workspace directory could not be created
    #[error("Error creating directory '{}': {message}", .path.display())]
    Directory { path: PathBuf, message: String },

    /// Transport failure, timeout or non-2xx status during a direct fetch
    #[error("Network error downloading from {url}: {message}")]
    Network { url: String, message: String },

    /// External binary missing from the execution environment
    #[error("'{tool}' command not found. Please ensure {tool} is installed and accessible in your system's PATH.")]
    ToolNotFound { tool: String },

    /// External tool ran and exited unsuccessfully
    #[error(
        "{tool} exited with {}.\n{tool} stdout:\n{stdout}\n{tool} stderr:\n{stderr}",
        describe_exit(.code)
    )]
    ToolExecution {
        tool: String,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// Delegated download finished but its output file could not be located
    #[error("{message}. Downloader output:\n{output}")]
    PathResolution { message: String, output: String },

    /// File system failure outside directory creation
    #[error("I/O error on '{}': {message}", .path.display())]
    Io { path: PathBuf, message: String },

    /// Another invocation is still running on the same pipeline
    #[error("A conversion is already in progress")]
    Busy,
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

impl DomainError {
    /// Short label for the failure class, used in logs and JSON output
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::Validation(_) => "validation",
            DomainError::Directory { .. } => "directory",
            DomainError::Network { .. } => "network",
            DomainError::ToolNotFound { .. } => "tool_not_found",
            DomainError::ToolExecution { .. } => "tool_execution",
            DomainError::PathResolution { .. } => "path_resolution",
            DomainError::Io { .. } => "io",
            DomainError::Busy => "busy",
        }
    }

    pub fn io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        DomainError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub fn directory(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        DomainError::Directory {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
