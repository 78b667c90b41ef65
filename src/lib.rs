//! droidbuild - Android SDK build pipeline
//!
//! Orchestrates the classic SDK command-line tools (aapt, aidl, javac,
//! dx, apkbuilder, jarsigner, zipalign) into a full build: manifest +
//! resources + sources in, signed and aligned apk out.
//!
//! ## Architecture
//!
//! ```text
//! Project → Platform stage operations → subprocess (one SDK tool each)
//! ```
//!
//! [`Project`](project::Project) assumes the conventional directory
//! layout and sequences a full build; [`Platform`](sdk::Platform) is
//! the low-level per-stage API for callers that need direct control.
//! Intermediate products flow between stages as
//! [`Artifact`](artifact::Artifact) handles with explicit, idempotent
//! deletion; tool failures carry the complete invocation context.

pub mod artifact;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod package;
pub mod project;
pub mod report;
pub mod sdk;
pub mod utils;

pub use artifact::{Artifact, ArtifactKind};
pub use config::BuildConfig;
pub use error::{BuildError, ToolFailure};
pub use package::{Package, PackageState};
pub use project::Project;
pub use report::{ConsoleReporter, Reporter, SilentReporter};
pub use sdk::{CompileOptions, Platform};
