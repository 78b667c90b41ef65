//! CLI argument parsing using clap derive macros

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::{build::BuildCommand, check::CheckCommand, clean::CleanCommand};

/// droidbuild - Android SDK build pipeline
///
/// Builds the Android project in the current directory into a signed,
/// aligned apk by driving the SDK command-line tools.
#[derive(Parser, Debug)]
#[command(name = "droidbuild")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (echo every tool command line)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the project in the current directory into an apk
    Build(BuildCommand),

    /// Remove generated code and build outputs
    Clean(CleanCommand),

    /// Check that the SDK tools this pipeline wraps are present
    Check(CheckCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        if self.no_color {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }

        match self.command {
            Commands::Build(cmd) => cmd.execute(self.verbose),
            Commands::Clean(cmd) => cmd.execute(self.verbose),
            Commands::Check(cmd) => cmd.execute(self.verbose),
        }
    }
}
