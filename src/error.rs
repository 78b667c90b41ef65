//! Error types for the build pipeline
//!
//! Every external-tool failure carries the full invocation context
//! (command line, working directory, exit status, both captured
//! streams) so a failing build stays diagnosable without re-running
//! anything.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Captured context of one failed external-tool invocation.
///
/// The streams are attached verbatim, never truncated.
#[derive(Debug, Clone)]
pub struct ToolFailure {
    /// Full command line, executable first
    pub cmdline: Vec<String>,
    /// Working directory the tool ran in
    pub cwd: PathBuf,
    /// Process exit code (-1 when terminated by signal)
    pub returncode: i32,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl ToolFailure {
    /// The command line as a single shell-style string.
    pub fn command_string(&self) -> String {
        self.cmdline.join(" ")
    }
}

impl std::fmt::Display for ToolFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "`{}` exited with code {}",
            self.command_string(),
            self.returncode
        )
    }
}

/// Failure taxonomy of the build pipeline.
///
/// No layer translates a lower failure into a different kind; whatever
/// a stage raises is what the caller sees.
#[derive(Error, Debug)]
pub enum BuildError {
    /// The external executable could not be located or started
    #[error("tool not found: {executable}")]
    ToolNotFound { executable: String },

    /// An external tool ran and reported failure via its exit status
    #[error("external tool failed: {0}")]
    ExternalTool(ToolFailure),

    /// The source compiler reported syntax or type errors
    #[error("compilation failed: {0}")]
    Compile(ToolFailure),

    /// The signer rejected the keystore or credentials
    #[error("signing failed: {0}")]
    Signing(ToolFailure),

    /// Resource packing or apk assembly failed
    #[error("packaging failed: {0}")]
    Packaging(ToolFailure),

    /// Caller misuse: deleted artifact used, invalid sign/align order,
    /// missing project layout
    #[error("precondition violated: {message}")]
    Precondition { message: String },

    /// Filesystem fault while managing artifacts
    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl BuildError {
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition {
            message: message.into(),
        }
    }

    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// The tool failure context, if this error carries one.
    pub fn tool_failure(&self) -> Option<&ToolFailure> {
        match self {
            Self::ExternalTool(f) | Self::Compile(f) | Self::Signing(f) | Self::Packaging(f) => {
                Some(f)
            }
            _ => None,
        }
    }

    /// Render the error to stderr with the failing tool's captured
    /// streams, for the CLI edge.
    pub fn display_with_context(&self) {
        use console::style;

        eprintln!("{} {}", style("error:").red().bold(), self);

        if let Some(failure) = self.tool_failure() {
            eprintln!(
                "\n{} {}",
                style("command:").cyan().bold(),
                failure.command_string()
            );
            eprintln!("{} {}", style("cwd:").cyan().bold(), failure.cwd.display());
            if !failure.stdout.is_empty() {
                eprintln!("\n{}\n{}", style("stdout:").cyan().bold(), failure.stdout);
            }
            if !failure.stderr.is_empty() {
                eprintln!("\n{}\n{}", style("stderr:").cyan().bold(), failure.stderr);
            }
        }
    }
}

/// Result alias used throughout the pipeline.
pub type Result<T, E = BuildError> = std::result::Result<T, E>;
