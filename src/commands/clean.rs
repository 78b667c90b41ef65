//! Clean command implementation

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use console::style;

/// Remove generated code and build outputs
#[derive(Args, Debug)]
pub struct CleanCommand {
    /// Show what would be deleted
    #[arg(long)]
    pub dry_run: bool,
}

impl CleanCommand {
    /// Execute the clean command
    pub fn execute(self, _verbose: bool) -> Result<()> {
        let project_dir =
            std::env::current_dir().context("Failed to get current working directory")?;
        if !project_dir.join("AndroidManifest.xml").is_file() {
            anyhow::bail!(
                "no AndroidManifest.xml in {}; not a project directory",
                project_dir.display()
            );
        }

        for name in ["bin", "gen"] {
            self.remove_tree(&project_dir.join(name), name)?;
        }
        Ok(())
    }

    fn remove_tree(&self, dir: &Path, name: &str) -> Result<()> {
        if !dir.is_dir() {
            println!("  {name}/ does not exist");
            return Ok(());
        }
        if self.dry_run {
            println!("  [dry run] would remove {name}/");
            return Ok(());
        }
        match fs::remove_dir_all(dir) {
            Ok(()) => {
                println!("  {} {name}/", style("removed").green());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("failed to remove {}", dir.display())),
        }
    }
}
