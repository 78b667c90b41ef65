//! Command-line construction for the wrapped SDK tools
//!
//! Each tool has a fixed, tool-specific argument order that must be
//! reproduced exactly; these builders are pure so the exact argv can be
//! asserted in tests without spawning anything.

use std::path::{Path, PathBuf};

use crate::utils::paths::classpath_separator;

fn s(path: &Path) -> String {
    path.display().to_string()
}

/// Arguments for one `aapt package` invocation.
///
/// Argument order: command, `-m`, `-M`, `-S`, `-A`, `-c`, the manifest
/// overrides, `-I` per include, `-F`, `-J`, `-f`.
#[derive(Debug, Default)]
pub struct AaptPackage {
    /// AndroidManifest.xml to include (-M)
    pub manifest: Option<PathBuf>,
    /// Directory in which to find resources (-S)
    pub resource_dir: Option<PathBuf>,
    /// Additional directory of raw asset files (-A)
    pub asset_dir: Option<PathBuf>,
    /// Comma-separated configuration qualifiers to include (-c);
    /// absent means all variants
    pub configurations: Option<String>,
    /// Override the manifest package id (--rename-manifest-package)
    pub rename_package: Option<String>,
    /// Override the manifest version code (--version-code)
    pub version_code: Option<u32>,
    /// Override the manifest version name (--version-name)
    pub version_name: Option<String>,
    /// Packages to include in the base set (-I)
    pub include: Vec<PathBuf>,
    /// The resource package file to output (-F)
    pub apk_output: Option<PathBuf>,
    /// Where to output R.java constant definitions (-J)
    pub r_output: Option<PathBuf>,
    /// Make package directories for the -J output (-m)
    pub make_dirs: bool,
    /// Overwrite an existing output file (-f)
    pub overwrite: bool,
}

impl AaptPackage {
    pub fn args(&self) -> Vec<String> {
        let mut args = vec!["package".to_string()];
        if self.make_dirs {
            args.push("-m".into());
        }
        if let Some(manifest) = &self.manifest {
            args.extend(["-M".into(), s(manifest)]);
        }
        if let Some(res) = &self.resource_dir {
            args.extend(["-S".into(), s(res)]);
        }
        if let Some(assets) = &self.asset_dir {
            args.extend(["-A".into(), s(assets)]);
        }
        if let Some(configs) = &self.configurations {
            args.extend(["-c".into(), configs.clone()]);
        }
        if let Some(package) = &self.rename_package {
            args.extend(["--rename-manifest-package".into(), package.clone()]);
        }
        if let Some(code) = self.version_code {
            args.extend(["--version-code".into(), code.to_string()]);
        }
        if let Some(name) = &self.version_name {
            args.extend(["--version-name".into(), name.clone()]);
        }
        for include in &self.include {
            args.extend(["-I".into(), s(include)]);
        }
        if let Some(output) = &self.apk_output {
            args.extend(["-F".into(), s(output)]);
        }
        if let Some(r_output) = &self.r_output {
            args.extend(["-J".into(), s(r_output)]);
        }
        if self.overwrite {
            args.push("-f".into());
        }
        args
    }
}

/// `aidl -p<framework.aidl> -I<search path>... -o<output> <file>`
pub fn aidl_args(
    aidl_file: &Path,
    preprocessed: &Path,
    search_paths: &[PathBuf],
    output_folder: &Path,
) -> Vec<String> {
    let mut args = vec![format!("-p{}", s(preprocessed))];
    for search in search_paths {
        args.push(format!("-I{}", s(search)));
    }
    args.push(format!("-o{}", s(output_folder)));
    args.push(s(aidl_file));
    args
}

/// `javac -target T -source T -d <classes> -bootclasspath <android.jar>
/// [-classpath <jars>] -g|-g:none <sources...>`
pub fn javac_args(
    files: &[PathBuf],
    destdir: &Path,
    target: &str,
    bootclasspath: &Path,
    classpath: &[PathBuf],
    debug: bool,
) -> Vec<String> {
    let mut args = vec![
        "-target".to_string(),
        target.to_string(),
        "-source".to_string(),
        target.to_string(),
        "-d".to_string(),
        s(destdir),
        "-bootclasspath".to_string(),
        s(bootclasspath),
    ];
    if !classpath.is_empty() {
        let joined = classpath
            .iter()
            .map(|p| s(p))
            .collect::<Vec<_>>()
            .join(classpath_separator());
        args.extend(["-classpath".to_string(), joined]);
    }
    args.push(if debug { "-g".into() } else { "-g:none".into() });
    args.extend(files.iter().map(|f| s(f)));
    args
}

/// `dx --dex --output=<out> <class dirs / archives...>`
pub fn dx_args(inputs: &[PathBuf], output: &Path) -> Vec<String> {
    let mut args = vec!["--dex".to_string(), format!("--output={}", s(output))];
    args.extend(inputs.iter().map(|i| s(i)));
    args
}

/// `apkbuilder <out> -u -f <dex> -z <zip>... [-rf <srcdir>]...`
pub fn apkbuilder_args(
    outputfile: &Path,
    dex: Option<&Path>,
    zips: &[PathBuf],
    source_dirs: &[PathBuf],
) -> Vec<String> {
    let mut args = vec![s(outputfile), "-u".to_string()];
    if let Some(dex) = dex {
        args.extend(["-f".to_string(), s(dex)]);
    }
    for zip in zips {
        args.extend(["-z".to_string(), s(zip)]);
    }
    for dir in source_dirs {
        args.extend(["-rf".to_string(), s(dir)]);
    }
    args
}

/// `jarsigner -keystore <ks> -storepass <pw> <jar> <alias>`
pub fn jarsigner_args(jarfile: &Path, keystore: &Path, alias: &str, password: &str) -> Vec<String> {
    vec![
        "-keystore".to_string(),
        s(keystore),
        "-storepass".to_string(),
        password.to_string(),
        s(jarfile),
        alias.to_string(),
    ]
}

/// `zipalign [-f] <align> <in> <out>`
pub fn zipalign_args(infile: &Path, outfile: &Path, align: u32, force: bool) -> Vec<String> {
    let mut args = Vec::new();
    if force {
        args.push("-f".to_string());
    }
    args.push(align.to_string());
    args.push(s(infile));
    args.push(s(outfile));
    args
}
