//! Subprocess execution with captured output

use std::ffi::OsStr;
use std::io::ErrorKind;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::DomainError;

/// Captured result of a finished subprocess
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedOutput {
    pub code: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    /// Convert a non-zero exit into a `ToolExecution` error
    pub fn into_success(self, tool: &str) -> Result<CapturedOutput, DomainError> {
        if self.success {
            Ok(self)
        } else {
            Err(DomainError::ToolExecution {
                tool: tool.to_string(),
                code: self.code,
                stdout: self.stdout,
                stderr: self.stderr,
            })
        }
    }
}

/// Run `program` with `args`, wait for it and capture both streams as text.
/// Stdin is closed so tools that would prompt fail instead of blocking.
pub async fn run_captured<I, S>(
    tool: &str,
    program: &str,
    args: I,
) -> Result<CapturedOutput, DomainError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    debug!(tool, program, "Spawning subprocess");

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => DomainError::ToolNotFound {
                tool: tool.to_string(),
            },
            _ => DomainError::ToolExecution {
                tool: tool.to_string(),
                code: None,
                stdout: String::new(),
                stderr: format!("Failed to start {}: {}", program, e),
            },
        })?;

    let captured = CapturedOutput {
        code: output.status.code(),
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    };
    debug!(tool, code = ?captured.code, "Subprocess finished");
    Ok(captured)
}

/// First line of `<program> <version_arg>`, or `None` if the tool cannot run
pub async fn probe_version(program: &str, version_arg: &str) -> Option<String> {
    let output = run_captured(program, program, [version_arg]).await.ok()?;
    if !output.success {
        return None;
    }
    output
        .stdout
        .lines()
        .chain(output.stderr.lines())
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}
