//! Blocking subprocess execution with full stream capture
//!
//! Every SDK tool goes through [`run_tool`]. The call blocks until the
//! subprocess exits, both streams are buffered in full, and a non-zero
//! exit becomes a [`ToolFailure`] carrying the complete invocation
//! context. Nothing here retries: callers treat each invocation as
//! non-idempotent.

use std::io;
use std::path::Path;
use std::process::Command;
use std::time::{Duration, Instant};

use crate::error::{BuildError, Result, ToolFailure};
use crate::report::Reporter;

/// Captured output of a successful tool invocation.
#[derive(Debug)]
pub struct ToolOutput {
    /// Captured standard output
    pub stdout: String,

    /// Captured standard error
    pub stderr: String,

    /// Execution duration
    pub duration: Duration,
}

/// Run an external tool, capturing both streams.
///
/// Fails with [`BuildError::ToolNotFound`] when the executable cannot
/// be started and with [`BuildError::ExternalTool`] when it exits
/// non-zero. Stage-specific callers rewrap the failure into their
/// specialized kind without losing the context.
pub fn run_tool(
    executable: &str,
    args: &[String],
    cwd: &Path,
    reporter: &dyn Reporter,
) -> Result<ToolOutput> {
    let mut cmdline = Vec::with_capacity(args.len() + 1);
    cmdline.push(executable.to_string());
    cmdline.extend(args.iter().cloned());
    reporter.command(&cmdline);

    let start = Instant::now();
    let output = Command::new(executable)
        .args(args)
        .current_dir(cwd)
        .output()
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => BuildError::ToolNotFound {
                executable: executable.to_string(),
            },
            _ => BuildError::io(format!("failed to spawn {executable}"), e),
        })?;
    let duration = start.elapsed();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if !output.status.success() {
        return Err(BuildError::ExternalTool(ToolFailure {
            cmdline,
            cwd: cwd.to_path_buf(),
            returncode: output.status.code().unwrap_or(-1),
            stdout,
            stderr,
        }));
    }

    Ok(ToolOutput {
        stdout,
        stderr,
        duration,
    })
}

/// Check if a command exists in PATH.
pub fn command_exists(program: &str) -> bool {
    which::which(program).is_ok()
}
