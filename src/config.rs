//! Per-pass build configuration
//!
//! One [`BuildConfig`] describes one packaging pass. It is constructed
//! up front and never mutated mid-pipeline; repeated
//! [`Project::build`](crate::project::Project::build) calls with
//! different configurations share one compilation pass.

use std::path::PathBuf;

/// Variable parameters of one build pass. All fields default to "use
/// what the manifest declares".
#[derive(Debug, Clone, Default)]
pub struct BuildConfig {
    /// Override the manifest's declared application id without touching
    /// the manifest file
    pub package_name: Option<String>,

    /// Override the manifest's declared version code
    pub version_code: Option<u32>,

    /// Override the manifest's declared version name
    pub version_name: Option<String>,

    /// Comma-separated locale/density qualifiers restricting which
    /// resource variants are packed, e.g. `"en,mdpi"`. Absent means all
    /// variants.
    pub config_filter: Option<String>,

    /// Destination for the produced apk; defaults to
    /// `bin/<name>.apk` under the project
    pub output_name: Option<PathBuf>,
}

impl BuildConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn package_name(mut self, name: impl Into<String>) -> Self {
        self.package_name = Some(name.into());
        self
    }

    pub fn version_code(mut self, code: u32) -> Self {
        self.version_code = Some(code);
        self
    }

    pub fn version_name(mut self, name: impl Into<String>) -> Self {
        self.version_name = Some(name.into());
        self
    }

    pub fn config_filter(mut self, filter: impl Into<String>) -> Self {
        self.config_filter = Some(filter.into());
        self
    }

    pub fn output_name(mut self, output: impl Into<PathBuf>) -> Self {
        self.output_name = Some(output.into());
        self
    }
}
