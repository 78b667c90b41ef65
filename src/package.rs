//! Built package handle and its finishing-state machine
//!
//! A freshly assembled apk is raw. The only legal finishing order is
//! sign, then align: alignment reorganizes the archive's uncompressed
//! entries onto 4-byte boundaries for memory-mapped access, and signing
//! afterwards would rewrite the archive and undo that work. The order
//! is enforced as a hard precondition, not left to documentation.

use std::path::Path;

use crate::artifact::Artifact;
use crate::error::{BuildError, Result};
use crate::sdk::Platform;

/// Finishing progress of a built package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageState {
    /// Unsigned and unaligned, straight out of the package builder
    Raw,
    /// Signed, not yet aligned
    Signed,
    /// Signed and aligned; ready for distribution
    Aligned,
}

/// A built apk plus the platform that knows how to finish it.
pub struct Package<'p> {
    platform: &'p Platform,
    artifact: Artifact,
    state: PackageState,
}

impl<'p> Package<'p> {
    pub(crate) fn raw(platform: &'p Platform, artifact: Artifact) -> Self {
        Self {
            platform,
            artifact,
            state: PackageState::Raw,
        }
    }

    pub fn state(&self) -> PackageState {
        self.state
    }

    pub fn is_signed(&self) -> bool {
        matches!(self.state, PackageState::Signed | PackageState::Aligned)
    }

    pub fn is_aligned(&self) -> bool {
        self.state == PackageState::Aligned
    }

    /// Path of the apk file.
    pub fn path(&self) -> Result<&Path> {
        self.artifact.path()
    }

    /// Sign the package in place.
    ///
    /// Only a raw package may be signed; signing an aligned package
    /// would invalidate its alignment, and re-signing a signed one is
    /// caller confusion. Both fail without touching the file.
    pub fn sign(&mut self, keystore: &Path, alias: &str, password: &str) -> Result<()> {
        match self.state {
            PackageState::Raw => {}
            PackageState::Signed => {
                return Err(BuildError::precondition("package is already signed"));
            }
            PackageState::Aligned => {
                return Err(BuildError::precondition(
                    "package is already aligned; signing would undo the alignment",
                ));
            }
        }
        let path = self.artifact.path()?.to_path_buf();
        self.platform.sign(&path, keystore, alias, password)?;
        self.state = PackageState::Signed;
        Ok(())
    }

    /// Align the package's uncompressed entries onto 4-byte boundaries,
    /// in place.
    ///
    /// Requires a signed package; aligning before signing fails with a
    /// precondition error and leaves the state unchanged.
    pub fn align(&mut self) -> Result<()> {
        match self.state {
            PackageState::Signed => {}
            PackageState::Raw => {
                return Err(BuildError::precondition(
                    "package must be signed before it is aligned",
                ));
            }
            PackageState::Aligned => {
                return Err(BuildError::precondition("package is already aligned"));
            }
        }
        let path = self.artifact.path()?.to_path_buf();
        self.platform.align(&path)?;
        self.state = PackageState::Aligned;
        Ok(())
    }

    /// Release the underlying apk file.
    pub fn delete(&mut self) -> Result<()> {
        self.artifact.delete()
    }

    /// Hand the underlying artifact back to the caller.
    pub fn into_artifact(self) -> Artifact {
        self.artifact
    }
}
