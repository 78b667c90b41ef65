//! SDK platform binding and pipeline stage operations
//!
//! A [`Platform`] binds one installed SDK platform (API level) to the
//! set of external tools that implement the pipeline stages. Each stage
//! operation is a pure function from input artifacts and configuration
//! to a fresh output artifact; all of them funnel through
//! [`run_tool`](crate::exec::subprocess::run_tool).

pub mod tools;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::artifact::{Artifact, ArtifactKind};
use crate::config::BuildConfig;
use crate::error::{BuildError, Result, ToolFailure};
use crate::exec::subprocess::run_tool;
use crate::package::Package;
use crate::report::Reporter;
use crate::utils::paths::{collect_jars, ensure_dir, find_files};

use self::tools::{
    aidl_args, apkbuilder_args, dx_args, jarsigner_args, javac_args, zipalign_args, AaptPackage,
};

/// Javac knobs that are not per-pass configuration.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Emit debugging information (`-g` vs `-g:none`)
    pub debug: bool,
    /// `-source`/`-target` language level
    pub target: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            debug: false,
            target: "1.5".to_string(),
        }
    }
}

/// Executable name with the platform-specific suffix.
fn exe(name: &str) -> String {
    if cfg!(windows) {
        format!("{name}.exe")
    } else {
        name.to_string()
    }
}

/// Like [`exe`] but for tools shipped as batch scripts on Windows.
fn bat(name: &str) -> String {
    if cfg!(windows) {
        format!("{name}.bat")
    } else {
        name.to_string()
    }
}

/// One SDK platform (API level) and the tools needed to build against
/// it. The SDK installation is treated as read-only and may be shared
/// freely across concurrent build passes.
pub struct Platform {
    version: String,
    sdk_dir: PathBuf,
    platform_dir: PathBuf,

    aapt: PathBuf,
    aidl: PathBuf,
    dx: PathBuf,
    apkbuilder: PathBuf,
    zipalign: PathBuf,
    // Resolved from PATH, not the SDK
    javac: String,
    jarsigner: String,

    framework_library: PathBuf,
    framework_aidl: PathBuf,

    reporter: Box<dyn Reporter>,
}

impl fmt::Debug for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Platform")
            .field("version", &self.version)
            .field("sdk_dir", &self.sdk_dir)
            .field("platform_dir", &self.platform_dir)
            .field("aapt", &self.aapt)
            .field("aidl", &self.aidl)
            .field("dx", &self.dx)
            .field("apkbuilder", &self.apkbuilder)
            .field("zipalign", &self.zipalign)
            .field("javac", &self.javac)
            .field("jarsigner", &self.jarsigner)
            .field("framework_library", &self.framework_library)
            .field("framework_aidl", &self.framework_aidl)
            .finish_non_exhaustive()
    }
}

impl Platform {
    /// Bind the requested (or newest installed) platform under an SDK
    /// root.
    ///
    /// Tool paths follow the SDK layout: `platform-tools/{aapt,aidl,dx}`
    /// and `tools/{apkbuilder,zipalign}`; `javac` and `jarsigner` come
    /// from `PATH`.
    pub fn locate(
        sdk_dir: &Path,
        target: Option<&str>,
        reporter: Box<dyn Reporter>,
    ) -> Result<Self> {
        let platforms_dir = sdk_dir.join("platforms");
        if !platforms_dir.is_dir() {
            return Err(BuildError::precondition(format!(
                "{} is not an SDK root (no platforms/ directory)",
                sdk_dir.display()
            )));
        }

        // Gives us pairs like ("10", <sdk>/platforms/android-10)
        let mut installed: Vec<(String, PathBuf)> = Vec::new();
        let entries = fs::read_dir(&platforms_dir)
            .map_err(|e| BuildError::io(format!("failed to list {}", platforms_dir.display()), e))?;
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if let Some(level) = name.rsplit('-').next() {
                installed.push((level.to_string(), path));
            }
        }
        installed.sort_by(|a, b| {
            let parse = |s: &str| s.parse::<u32>().unwrap_or(0);
            parse(&a.0).cmp(&parse(&b.0)).then_with(|| a.0.cmp(&b.0))
        });

        let (version, platform_dir) = match target {
            Some(wanted) => installed
                .into_iter()
                .find(|(level, _)| level == wanted)
                .ok_or_else(|| {
                    BuildError::precondition(format!(
                        "target {} not found in {}",
                        wanted,
                        sdk_dir.display()
                    ))
                })?,
            None => installed.into_iter().last().ok_or_else(|| {
                BuildError::precondition(format!(
                    "no platforms installed under {}",
                    sdk_dir.display()
                ))
            })?,
        };

        let platform_tools = sdk_dir.join("platform-tools");
        let sdk_tools = sdk_dir.join("tools");
        Ok(Self {
            aapt: platform_tools.join(exe("aapt")),
            aidl: platform_tools.join(exe("aidl")),
            dx: platform_tools.join(bat("dx")),
            apkbuilder: sdk_tools.join(bat("apkbuilder")),
            zipalign: sdk_tools.join(exe("zipalign")),
            javac: exe("javac"),
            jarsigner: exe("jarsigner"),
            framework_library: platform_dir.join("android.jar"),
            framework_aidl: platform_dir.join("framework.aidl"),
            sdk_dir: sdk_dir.to_path_buf(),
            version,
            platform_dir,
            reporter,
        })
    }

    /// API level this platform targets.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn sdk_dir(&self) -> &Path {
        &self.sdk_dir
    }

    pub fn platform_dir(&self) -> &Path {
        &self.platform_dir
    }

    /// The platform's bootclasspath jar.
    pub fn framework_library(&self) -> &Path {
        &self.framework_library
    }

    pub fn reporter(&self) -> &dyn Reporter {
        &*self.reporter
    }

    /// The wrapped tools and their resolved locations, for environment
    /// checks.
    pub fn tool_paths(&self) -> Vec<(&'static str, PathBuf)> {
        vec![
            ("aapt", self.aapt.clone()),
            ("aidl", self.aidl.clone()),
            ("dx", self.dx.clone()),
            ("apkbuilder", self.apkbuilder.clone()),
            ("zipalign", self.zipalign.clone()),
            ("javac", PathBuf::from(&self.javac)),
            ("jarsigner", PathBuf::from(&self.jarsigner)),
        ]
    }

    fn run(&self, executable: &Path, args: Vec<String>, cwd: &Path) -> Result<()> {
        let exe = executable.to_string_lossy();
        run_tool(&exe, &args, cwd, &*self.reporter)?;
        Ok(())
    }

    /// Generate the resource-identifier source (R.java) for a manifest
    /// and resource tree into `output_dir`.
    ///
    /// Roughly: `aapt package -m -J gen/ -M AndroidManifest.xml -S res/
    /// -I android.jar`
    pub fn generate_r(
        &self,
        manifest: &Path,
        resource_dir: &Path,
        output_dir: &Path,
        package_name: Option<&str>,
    ) -> Result<Artifact> {
        self.reporter.stage("generate-resource-ids");
        ensure_dir(output_dir)?;
        let args = AaptPackage {
            manifest: Some(manifest.to_path_buf()),
            resource_dir: Some(resource_dir.to_path_buf()),
            include: vec![self.framework_library.clone()],
            r_output: Some(output_dir.to_path_buf()),
            make_dirs: true,
            rename_package: package_name.map(str::to_string),
            ..AaptPackage::default()
        }
        .args();
        self.run(&self.aapt, args, &cwd_of(manifest))
            .map_err(packaging)?;
        Ok(Artifact::new(output_dir, ArtifactKind::GeneratedSource))
    }

    /// Compile every `.aidl` definition found under `source_dirs` into
    /// generated source stubs in `output_dir`.
    ///
    /// Zero interface files is a valid, non-error outcome (the returned
    /// list is empty).
    pub fn compile_aidl(&self, source_dirs: &[PathBuf], output_dir: &Path) -> Result<Vec<Artifact>> {
        self.reporter.stage("compile-interfaces");
        ensure_dir(output_dir)?;
        let mut generated = Vec::new();
        for file in find_files(source_dirs, "aidl") {
            let args = aidl_args(&file, &self.framework_aidl, source_dirs, output_dir);
            self.run(&self.aidl, args, output_dir)?;

            // aidl mirrors the source's package directory layout under
            // the output folder
            let stub = match source_dirs
                .iter()
                .find_map(|root| file.strip_prefix(root).ok())
            {
                Some(rel) => output_dir.join(rel.with_extension("java")),
                None => output_dir.join(file.with_extension("java")),
            };
            generated.push(Artifact::new(stub, ArtifactKind::GeneratedSource));
        }
        Ok(generated)
    }

    /// Compile all `.java` sources under `source_dirs` (including any
    /// generated sources) into class files under `output_dir`.
    ///
    /// `extra_jars` entries join the classpath; directories are
    /// searched recursively for jar files.
    pub fn compile_sources(
        &self,
        source_dirs: &[PathBuf],
        output_dir: &Path,
        extra_jars: &[PathBuf],
        opts: &CompileOptions,
    ) -> Result<Artifact> {
        self.reporter.stage("compile-sources");
        let sources = find_files(source_dirs, "java");
        if sources.is_empty() {
            return Err(BuildError::precondition(format!(
                "no Java sources found under {}",
                source_dirs
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }
        ensure_dir(output_dir)?;
        let classpath = collect_jars(extra_jars);
        let args = javac_args(
            &sources,
            output_dir,
            &opts.target,
            &self.framework_library,
            &classpath,
            opts.debug,
        );
        self.run(Path::new(&self.javac), args, output_dir)
            .map_err(|e| specialize(e, BuildError::Compile))?;
        Ok(Artifact::new(output_dir, ArtifactKind::CompiledCode))
    }

    /// Translate compiled class files (plus any extra code archives)
    /// into a single Dalvik bytecode artifact.
    ///
    /// Roughly: `dx --dex --output=bin/classes.dex bin/classes libs/*.jar`
    pub fn dex(
        &self,
        code: &Artifact,
        extra_jars: &[PathBuf],
        output: Option<PathBuf>,
    ) -> Result<Artifact> {
        self.reporter.stage("translate-to-bytecode");
        let code_path = code.path()?.to_path_buf();
        let output = match output {
            Some(path) => path,
            None => keep_tempfile(".dex")?,
        };
        let mut inputs = vec![code_path.clone()];
        inputs.extend(collect_jars(extra_jars));
        let args = dx_args(&inputs, &output);
        self.run(&self.dx, args, &cwd_of(&code_path))?;
        Ok(Artifact::new(output, ArtifactKind::Dex))
    }

    /// Whole front half of the pipeline in one call: generate R,
    /// compile interfaces, compile sources, translate to bytecode.
    ///
    /// Generated-source and class directories are temporary and removed
    /// on every exit path, including failure.
    pub fn compile(
        &self,
        manifest: &Path,
        source_dirs: &[PathBuf],
        resource_dir: &Path,
        extra_jars: &[PathBuf],
        dex_output: Option<PathBuf>,
        opts: &CompileOptions,
    ) -> Result<Artifact> {
        let source_gen = TempDir::new()
            .map_err(|e| BuildError::io("failed to create generated-source directory", e))?;
        let classes = TempDir::new()
            .map_err(|e| BuildError::io("failed to create class output directory", e))?;

        self.generate_r(manifest, resource_dir, source_gen.path(), None)?;
        self.compile_aidl(source_dirs, source_gen.path())?;
        let mut all_sources = source_dirs.to_vec();
        all_sources.push(source_gen.path().to_path_buf());
        let code = self.compile_sources(&all_sources, classes.path(), extra_jars, opts)?;
        self.dex(&code, extra_jars, dex_output)
    }

    /// Pack the manifest and resource tree into a binary resource
    /// package, honoring the configuration's locale/density filter and
    /// package/version overrides. The on-disk manifest is never
    /// modified.
    pub fn pack_resources(
        &self,
        manifest: &Path,
        resource_dir: &Path,
        asset_dir: Option<&Path>,
        config: &BuildConfig,
        output: Option<PathBuf>,
    ) -> Result<Artifact> {
        self.reporter.stage("pack-resources");
        let output = match output {
            Some(path) => path,
            None => keep_tempfile(".ap_")?,
        };
        let args = AaptPackage {
            manifest: Some(manifest.to_path_buf()),
            resource_dir: Some(resource_dir.to_path_buf()),
            asset_dir: asset_dir.map(Path::to_path_buf),
            configurations: config.config_filter.clone(),
            rename_package: config.package_name.clone(),
            version_code: config.version_code,
            version_name: config.version_name.clone(),
            include: vec![self.framework_library.clone()],
            apk_output: Some(output.clone()),
            // aapt only reports an error code with -f, so it is always on
            overwrite: true,
            ..AaptPackage::default()
        }
        .args();
        self.run(&self.aapt, args, &cwd_of(manifest))
            .map_err(packaging)?;
        Ok(Artifact::new(output, ArtifactKind::ResourcePackage))
    }

    /// Assemble an unsigned, unaligned apk from translated code and a
    /// packed resource package.
    pub fn build_apk(
        &self,
        output: &Path,
        dex: &Artifact,
        resources: &Artifact,
        source_dirs: &[PathBuf],
    ) -> Result<Package<'_>> {
        self.reporter.stage("build-package");
        if let Some(parent) = output.parent() {
            ensure_dir(parent)?;
        }
        let dex_path = dex.path()?;
        let resource_path = resources.path()?;
        let args = apkbuilder_args(output, Some(dex_path), &[resource_path.to_path_buf()], source_dirs);
        self.run(&self.apkbuilder, args, &cwd_of(output))
            .map_err(packaging)?;
        Ok(Package::raw(
            self,
            Artifact::new(output, ArtifactKind::Apk),
        ))
    }

    /// Sign an apk in place with jarsigner.
    pub(crate) fn sign(
        &self,
        apk: &Path,
        keystore: &Path,
        alias: &str,
        password: &str,
    ) -> Result<()> {
        self.reporter.stage("sign");
        let args = jarsigner_args(apk, keystore, alias, password);
        self.run(Path::new(&self.jarsigner), args, &cwd_of(apk))
            .map_err(|e| specialize(e, BuildError::Signing))
    }

    /// Align an apk's uncompressed entries onto 4-byte boundaries, in
    /// place. Writes to a sibling temp name, then renames over the
    /// input.
    pub(crate) fn align(&self, apk: &Path) -> Result<()> {
        self.reporter.stage("align");
        let aligned = apk.with_extension("apk.aligned");
        let args = zipalign_args(apk, &aligned, 4, true);
        self.run(&self.zipalign, args, &cwd_of(apk))?;
        fs::rename(&aligned, apk).map_err(|e| {
            BuildError::io(
                format!("failed to move {} over {}", aligned.display(), apk.display()),
                e,
            )
        })
    }
}

/// Rewrap a generic tool failure into a stage-specific kind, leaving
/// every other error untouched.
fn specialize(err: BuildError, wrap: fn(ToolFailure) -> BuildError) -> BuildError {
    match err {
        BuildError::ExternalTool(failure) => wrap(failure),
        other => other,
    }
}

fn packaging(err: BuildError) -> BuildError {
    specialize(err, BuildError::Packaging)
}

/// Working directory for a tool: the file's parent, or `.` at a root.
fn cwd_of(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Create an empty file with the given suffix that outlives the call.
fn keep_tempfile(suffix: &str) -> Result<PathBuf> {
    let file = tempfile::Builder::new()
        .prefix("droidbuild-")
        .suffix(suffix)
        .tempfile()
        .map_err(|e| BuildError::io("failed to create temporary output", e))?;
    file.into_temp_path()
        .keep()
        .map_err(|e| BuildError::io("failed to persist temporary output", e.error))
}
