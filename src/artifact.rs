//! Intermediate build products
//!
//! Artifacts are the only values that flow between pipeline stages:
//! each stage operation on [`Platform`](crate::sdk::Platform) returns
//! exactly one, and whoever receives it owns its storage. Deletion is
//! explicit and one-shot; a deleted artifact must never reach a
//! downstream stage.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{BuildError, Result};

/// What a build product is, as far as the pipeline cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Generated source (R.java, aidl stubs)
    GeneratedSource,
    /// Compiled class files (a directory of .class output)
    CompiledCode,
    /// Translated Dalvik bytecode (classes.dex)
    Dex,
    /// Packed binary resources (.ap_)
    ResourcePackage,
    /// An apk; signing/alignment progress is tracked by
    /// [`Package`](crate::package::Package)
    Apk,
}

/// Handle to one build product on disk.
#[derive(Debug)]
pub struct Artifact {
    path: PathBuf,
    kind: ArtifactKind,
    live: bool,
}

impl Artifact {
    /// Take ownership of a file or directory a stage just produced.
    pub fn new(path: impl Into<PathBuf>, kind: ArtifactKind) -> Self {
        Self {
            path: path.into(),
            kind,
            live: true,
        }
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    /// Whether the underlying storage is still owned and usable.
    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Path to the underlying storage.
    ///
    /// Fails with a precondition error once the artifact has been
    /// deleted: a dead artifact flowing into a downstream stage is
    /// caller misuse, not a retryable condition.
    pub fn path(&self) -> Result<&Path> {
        if !self.live {
            return Err(BuildError::precondition(format!(
                "artifact {} was already deleted",
                self.path.display()
            )));
        }
        Ok(&self.path)
    }

    /// Remove the underlying file or directory.
    ///
    /// Idempotent: deleting twice (or deleting storage that is already
    /// gone) is a no-op, never an error.
    pub fn delete(&mut self) -> Result<()> {
        if !self.live {
            return Ok(());
        }
        self.live = false;

        let result = if self.path.is_dir() {
            fs::remove_dir_all(&self.path)
        } else {
            fs::remove_file(&self.path)
        };
        match result {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BuildError::io(
                format!("failed to delete artifact {}", self.path.display()),
                e,
            )),
        }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} <{}>", self.kind, self.path.display())
    }
}
