//! Check command implementation
//!
//! Resolves a platform under the given SDK root and reports whether
//! each wrapped tool can be found, without running any of them.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use console::style;

use crate::exec::subprocess::command_exists;
use crate::report::ConsoleReporter;
use crate::sdk::Platform;

/// Check that the SDK tools this pipeline wraps are present
#[derive(Args, Debug)]
pub struct CheckCommand {
    /// SDK root directory
    pub sdk_dir: PathBuf,

    /// API level to check (defaults to the newest installed)
    #[arg(long)]
    pub target: Option<String>,
}

impl CheckCommand {
    /// Execute the check command
    pub fn execute(self, verbose: bool) -> Result<()> {
        let platform = Platform::locate(
            &self.sdk_dir,
            self.target.as_deref(),
            Box::new(ConsoleReporter::new(verbose)),
        )?;

        println!(
            "Platform android-{} at {}",
            platform.version(),
            platform.platform_dir().display()
        );

        let mut missing = Vec::new();
        for (name, path) in platform.tool_paths() {
            // jarsigner/javac come from PATH rather than the SDK
            let found = if path.components().count() > 1 {
                path.is_file()
            } else {
                command_exists(&path.to_string_lossy())
            };
            if found {
                println!("  {} {name}", style("ok").green().bold());
            } else {
                println!("  {} {name} ({})", style("missing").red().bold(), path.display());
                missing.push(name);
            }
        }

        if !missing.is_empty() {
            anyhow::bail!("missing tools: {}", missing.join(", "));
        }
        println!("{} all tools present", style("ok:").green().bold());
        Ok(())
    }
}
