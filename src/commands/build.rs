//! Build command implementation
//!
//! Mirrors the stand-alone mode: operate on the current working
//! directory with the conventional AndroidManifest.xml/src/res layout,
//! build the apk, then sign and align it when a keystore is available.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use console::style;

use crate::config::BuildConfig;
use crate::project::Project;
use crate::report::ConsoleReporter;
use crate::sdk::Platform;

/// Build the project in the current directory into an apk
#[derive(Args, Debug)]
pub struct BuildCommand {
    /// SDK root directory
    pub sdk_dir: PathBuf,

    /// API level to build against (defaults to the newest installed)
    #[arg(long)]
    pub target: Option<String>,

    /// Comma-separated locale/density qualifiers restricting which
    /// resource variants are packed, e.g. "en,mdpi"
    #[arg(long, value_name = "QUALIFIERS")]
    pub config: Option<String>,

    /// Override the manifest's application id
    #[arg(long)]
    pub package_name: Option<String>,

    /// Override the manifest's version code
    #[arg(long)]
    pub version_code: Option<u32>,

    /// Override the manifest's version name
    #[arg(long)]
    pub version_name: Option<String>,

    /// Destination for the produced apk (defaults to bin/<package>.apk)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Keystore to sign with (defaults to ~/.android/debug.keystore
    /// when present)
    #[arg(long)]
    pub keystore: Option<PathBuf>,

    /// Keystore alias
    #[arg(long, default_value = "androiddebugkey")]
    pub alias: String,

    /// Keystore password
    #[arg(long, default_value = "android")]
    pub storepass: String,

    /// Leave the package unsigned and unaligned
    #[arg(long)]
    pub no_sign: bool,
}

impl BuildCommand {
    /// Execute the build command
    pub fn execute(self, verbose: bool) -> Result<()> {
        let platform = Platform::locate(
            &self.sdk_dir,
            self.target.as_deref(),
            Box::new(ConsoleReporter::new(verbose)),
        )?;

        let project_dir =
            std::env::current_dir().context("Failed to get current working directory")?;
        let mut project = Project::new(&platform, project_dir.join("AndroidManifest.xml"))?;

        let mut config = BuildConfig::new();
        config.package_name = self.package_name;
        config.version_code = self.version_code;
        config.version_name = self.version_name;
        config.config_filter = self.config;
        config.output_name = self.output;

        let mut package = project.build(&config)?;

        if self.no_sign {
            println!(
                "{} package left unsigned: {}",
                style("note:").yellow().bold(),
                package.path()?.display()
            );
        } else {
            match self.keystore.or_else(debug_keystore) {
                Some(keystore) => {
                    package.sign(&keystore, &self.alias, &self.storepass)?;
                    package.align()?;
                }
                None => {
                    println!(
                        "{} no keystore found, package will be unsigned",
                        style("note:").yellow().bold()
                    );
                }
            }
        }

        println!(
            "{} {}",
            style("created:").green().bold(),
            package.path()?.display()
        );
        Ok(())
    }
}

/// The SDK's conventional debug keystore, when it exists.
fn debug_keystore() -> Option<PathBuf> {
    let dirs = directories::UserDirs::new()?;
    let keystore = dirs.home_dir().join(".android").join("debug.keystore");
    keystore.is_file().then_some(keystore)
}
