//! High-level build orchestration over a conventional project layout
//!
//! Given the location of an `AndroidManifest.xml`, a [`Project`]
//! assumes sources under `./src`, resources under `./res`, raw assets
//! under `./assets`, bundled jars under `./libs`, generated code under
//! `./gen` and outputs under `./bin`.
//!
//! Compilation is the expensive, shared step; packaging is the cheap,
//! variable one. One [`compile`](Project::compile) pass feeds any
//! number of [`build`](Project::build) calls with different
//! configurations.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::artifact::Artifact;
use crate::config::BuildConfig;
use crate::error::{BuildError, Result};
use crate::package::Package;
use crate::sdk::{CompileOptions, Platform};
use crate::utils::paths::{ensure_dir, only_existing};

/// An Android project to be built against one platform.
#[derive(Debug)]
pub struct Project<'p> {
    platform: &'p Platform,

    manifest: PathBuf,
    project_dir: PathBuf,
    source_dir: PathBuf,
    resource_dir: PathBuf,
    asset_dir: PathBuf,
    lib_dir: PathBuf,
    gen_dir: PathBuf,
    out_dir: PathBuf,

    /// Application id declared by the manifest; used for output naming
    name: String,

    /// Additional source roots beyond ./src
    pub extra_source_dirs: Vec<PathBuf>,
    /// Additional classpath jars beyond ./libs
    pub extra_jars: Vec<PathBuf>,
    /// Javac knobs shared by every pass
    pub compile_options: CompileOptions,

    // Cached translated bytecode from the last compile() pass
    code: Option<Artifact>,
    // Every artifact this project produced and still owns, registered
    // the moment a stage returns it so partial failures leave nothing
    // untracked
    artifacts: Vec<Artifact>,
}

impl<'p> Project<'p> {
    /// Bind a project to a platform by its manifest location.
    ///
    /// The manifest and the conventional `src/` and `res/` directories
    /// next to it must already exist.
    pub fn new(platform: &'p Platform, manifest: impl Into<PathBuf>) -> Result<Self> {
        let manifest = manifest.into();
        if !manifest.is_file() {
            return Err(BuildError::precondition(format!(
                "manifest {} does not exist",
                manifest.display()
            )));
        }
        let manifest = manifest.canonicalize().map_err(|e| {
            BuildError::io(format!("failed to resolve {}", manifest.display()), e)
        })?;
        let project_dir = manifest
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| BuildError::precondition("manifest has no parent directory"))?;

        let source_dir = project_dir.join("src");
        let resource_dir = project_dir.join("res");
        for required in [&source_dir, &resource_dir] {
            if !required.is_dir() {
                return Err(BuildError::precondition(format!(
                    "expected project directory {} is missing",
                    required.display()
                )));
            }
        }

        let name = manifest_package(&manifest)?;

        Ok(Self {
            platform,
            asset_dir: project_dir.join("assets"),
            lib_dir: project_dir.join("libs"),
            gen_dir: project_dir.join("gen"),
            out_dir: project_dir.join("bin"),
            manifest,
            project_dir,
            source_dir,
            resource_dir,
            name,
            extra_source_dirs: Vec::new(),
            extra_jars: Vec::new(),
            compile_options: CompileOptions::default(),
            code: None,
            artifacts: Vec::new(),
        })
    }

    /// Application id declared by the manifest.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Whether a compiled-code artifact from a previous pass is cached.
    pub fn is_compiled(&self) -> bool {
        self.code.is_some()
    }

    /// Path of the cached translated bytecode, if any.
    pub fn code_path(&self) -> Option<&Path> {
        self.code.as_ref().and_then(|a| a.path().ok())
    }

    fn classpath(&self) -> Vec<PathBuf> {
        let mut jars = only_existing(std::slice::from_ref(&self.lib_dir));
        jars.extend(self.extra_jars.iter().cloned());
        jars
    }

    fn source_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = vec![self.source_dir.clone()];
        dirs.extend(self.extra_source_dirs.iter().cloned());
        dirs
    }

    /// Force a recompile: generate R, compile interfaces, compile
    /// sources, translate to bytecode into `bin/classes.dex`.
    ///
    /// The resulting bytecode artifact is cached so repeated
    /// [`build`](Self::build) calls need not recompile.
    pub fn compile(&mut self) -> Result<()> {
        ensure_dir(&self.out_dir)?;

        let generated = self.platform.generate_r(
            &self.manifest,
            &self.resource_dir,
            &self.gen_dir,
            None,
        )?;
        self.artifacts.push(generated);

        let source_dirs = self.source_dirs();
        let stubs = self.platform.compile_aidl(&source_dirs, &self.gen_dir)?;
        self.artifacts.extend(stubs);

        let mut all_sources = source_dirs;
        all_sources.push(self.gen_dir.clone());
        let classes = self.platform.compile_sources(
            &all_sources,
            &self.out_dir.join("classes"),
            &self.classpath(),
            &self.compile_options,
        )?;
        self.artifacts.push(classes);
        let classes_ref = self.artifacts.last().expect("just pushed");

        let dex = self.platform.dex(
            classes_ref,
            &self.classpath(),
            Some(self.out_dir.join("classes.dex")),
        )?;
        self.code = Some(dex);
        Ok(())
    }

    /// Build one apk variant, compiling first if needed.
    ///
    /// May be called repeatedly with different configurations; every
    /// call shares the cached compilation and only re-runs resource
    /// packing and apk assembly.
    pub fn build(&mut self, config: &BuildConfig) -> Result<Package<'p>> {
        if self.code.is_none() {
            self.compile()?;
        }
        ensure_dir(&self.out_dir)?;

        let resource_output = match &config.config_filter {
            Some(filter) => self.out_dir.join(format!("{}.{}.ap_", self.name, filter)),
            None => self.out_dir.join(format!("{}.ap_", self.name)),
        };
        let asset_dir = self.asset_dir.is_dir().then_some(self.asset_dir.as_path());
        let resources = self.platform.pack_resources(
            &self.manifest,
            &self.resource_dir,
            asset_dir,
            config,
            Some(resource_output),
        )?;
        self.artifacts.push(resources);
        let resources_ref = self.artifacts.last().expect("just pushed");

        let output = config
            .output_name
            .clone()
            .unwrap_or_else(|| self.out_dir.join(format!("{}.apk", self.name)));
        let code = self.code.as_ref().expect("compiled above");
        self.platform.build_apk(
            &output,
            code,
            resources_ref,
            &only_existing(std::slice::from_ref(&self.source_dir)),
        )
    }

    /// Delete every artifact this project still owns and reset the
    /// cached compilation, then remove the `bin/` and `gen/` trees.
    ///
    /// Safe to call repeatedly, and safe after a build pass failed
    /// partway: artifacts are registered as soon as they are produced.
    pub fn clean(&mut self) -> Result<()> {
        let mut first_error = None;

        if let Some(mut code) = self.code.take() {
            if let Err(e) = code.delete() {
                first_error.get_or_insert(e);
            }
        }
        for mut artifact in self.artifacts.drain(..) {
            if let Err(e) = artifact.delete() {
                first_error.get_or_insert(e);
            }
        }

        for dir in [&self.out_dir, &self.gen_dir] {
            match fs::remove_dir_all(dir) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    first_error.get_or_insert(BuildError::io(
                        format!("failed to remove {}", dir.display()),
                        e,
                    ));
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Extract the application id from a manifest without a full XML parse.
fn manifest_package(manifest: &Path) -> Result<String> {
    let text = fs::read_to_string(manifest)
        .map_err(|e| BuildError::io(format!("failed to read {}", manifest.display()), e))?;
    let pattern = Regex::new(r#"package\s*=\s*"([^"]+)""#).expect("valid pattern");
    pattern
        .captures(&text)
        .map(|c| c[1].to_string())
        .ok_or_else(|| {
            BuildError::precondition(format!(
                "{} declares no package attribute",
                manifest.display()
            ))
        })
}
