//! End-to-end pipeline tests against a fake SDK of stub tools.
//!
//! The stubs record their argv into the files they produce, so these
//! tests can assert the exact tool invocations without a real SDK.

#![cfg(unix)]

mod common;

use std::fs;
use std::path::Path;

use serial_test::serial;

use droidbuild::{BuildConfig, BuildError, CompileOptions, Platform, Project, SilentReporter};

fn platform(sdk: &Path) -> Platform {
    Platform::locate(sdk, None, Box::new(SilentReporter)).unwrap()
}

fn use_stub_path(bin: &Path) {
    std::env::set_var("PATH", common::path_with(bin));
}

#[test]
#[serial]
fn full_build_then_sign_then_align() {
    let root = tempfile::tempdir().unwrap();
    let sdk = common::fake_sdk(root.path());
    use_stub_path(&common::stub_path_bin(root.path()));
    let project_dir = common::scaffold_project(root.path());

    let platform = platform(&sdk);
    let mut project = Project::new(&platform, project_dir.join("AndroidManifest.xml")).unwrap();

    let mut package = project.build(&BuildConfig::new()).unwrap();
    let apk = package.path().unwrap().to_path_buf();
    assert_eq!(
        apk,
        project_dir
            .canonicalize()
            .unwrap()
            .join("bin/com.example.app.apk")
    );
    assert!(apk.is_file());
    assert!(!package.is_signed());

    package
        .sign(Path::new("debug.keystore"), "androiddebugkey", "android")
        .unwrap();
    assert!(package.is_signed());
    package.align().unwrap();
    assert!(package.is_aligned());

    let contents = fs::read_to_string(&apk).unwrap();
    assert!(contents.contains("signed"));
    assert!(contents.contains("aligned"));
}

#[test]
#[serial]
fn align_before_sign_leaves_package_untouched() {
    let root = tempfile::tempdir().unwrap();
    let sdk = common::fake_sdk(root.path());
    use_stub_path(&common::stub_path_bin(root.path()));
    let project_dir = common::scaffold_project(root.path());

    let platform = platform(&sdk);
    let mut project = Project::new(&platform, project_dir.join("AndroidManifest.xml")).unwrap();
    let mut package = project.build(&BuildConfig::new()).unwrap();

    let before = fs::read(package.path().unwrap()).unwrap();
    let err = package.align().unwrap_err();
    assert!(matches!(err, BuildError::Precondition { .. }));
    assert!(!package.is_aligned());
    assert_eq!(fs::read(package.path().unwrap()).unwrap(), before);
}

#[test]
#[serial]
fn one_compilation_feeds_many_variants() {
    let root = tempfile::tempdir().unwrap();
    let sdk = common::fake_sdk(root.path());
    use_stub_path(&common::stub_path_bin(root.path()));
    let project_dir = common::scaffold_project(root.path());

    let platform = platform(&sdk);
    let mut project = Project::new(&platform, project_dir.join("AndroidManifest.xml")).unwrap();

    project.compile().unwrap();
    let dex = project_dir.join("bin/classes.dex");
    let compiled = fs::read(&dex).unwrap();

    let en = project
        .build(&BuildConfig::new().config_filter("en"))
        .unwrap();
    let all = project.build(&BuildConfig::new()).unwrap();

    // Variant-specific resource packages, one shared compilation
    assert!(project_dir.join("bin/com.example.app.en.ap_").is_file());
    assert!(project_dir.join("bin/com.example.app.ap_").is_file());
    assert_eq!(fs::read(&dex).unwrap(), compiled);
    assert!(en.path().unwrap().is_file());
    assert!(all.path().unwrap().is_file());
}

#[test]
#[serial]
fn config_filter_and_overrides_reach_aapt_verbatim() {
    let root = tempfile::tempdir().unwrap();
    let sdk = common::fake_sdk(root.path());
    use_stub_path(&common::stub_path_bin(root.path()));
    let project_dir = common::scaffold_project(root.path());
    let manifest = project_dir.join("AndroidManifest.xml");
    let manifest_before = fs::read(&manifest).unwrap();

    let platform = platform(&sdk);
    let mut project = Project::new(&platform, &manifest).unwrap();

    let config = BuildConfig::new()
        .config_filter("en,mdpi")
        .package_name("com.example.app.pro")
        .version_code(2);
    project.build(&config).unwrap();

    let recorded =
        fs::read_to_string(project_dir.join("bin/com.example.app.en,mdpi.ap_")).unwrap();
    assert!(recorded.contains("-c en,mdpi"));
    assert!(recorded.contains("--rename-manifest-package com.example.app.pro"));
    assert!(recorded.contains("--version-code 2"));

    // The override never touches the on-disk manifest
    assert_eq!(fs::read(&manifest).unwrap(), manifest_before);

    // An absent filter packs all variants: no -c argument at all
    project.build(&BuildConfig::new()).unwrap();
    let unfiltered = fs::read_to_string(project_dir.join("bin/com.example.app.ap_")).unwrap();
    assert!(!unfiltered.contains("-c "));
    assert!(!unfiltered.contains("--rename-manifest-package"));
}

#[test]
#[serial]
fn failed_compilation_carries_argv_and_stderr() {
    let root = tempfile::tempdir().unwrap();
    let sdk = common::fake_sdk(root.path());
    let bin = common::stub_path_bin(root.path());
    common::break_javac(&bin);
    use_stub_path(&bin);
    let project_dir = common::scaffold_project(root.path());

    let platform = platform(&sdk);
    let mut project = Project::new(&platform, project_dir.join("AndroidManifest.xml")).unwrap();

    let err = project.compile().unwrap_err();
    let failure = match &err {
        BuildError::Compile(f) => f,
        other => panic!("expected a compile error, got {other:?}"),
    };
    assert_eq!(failure.returncode, 1);
    assert!(failure.stderr.contains("error: ';' expected"));
    // The exact argument list survives: bootclasspath and source roots
    assert!(failure
        .cmdline
        .iter()
        .any(|a| a.ends_with("android.jar")));
    assert!(failure
        .cmdline
        .iter()
        .any(|a| a.ends_with("src/com/example/Main.java")));

    // clean() after the partial failure empties the output directories
    project.clean().unwrap();
    assert!(!project_dir.join("bin").exists());
    assert!(!project_dir.join("gen").exists());

    // And it is safe to call again
    project.clean().unwrap();
}

#[test]
#[serial]
fn platform_compile_shortcut_yields_a_dex_artifact() {
    let root = tempfile::tempdir().unwrap();
    let sdk = common::fake_sdk(root.path());
    use_stub_path(&common::stub_path_bin(root.path()));
    let project_dir = common::scaffold_project(root.path());
    let dex_out = root.path().join("shortcut.dex");

    let platform = platform(&sdk);
    let dex = platform
        .compile(
            &project_dir.join("AndroidManifest.xml"),
            &[project_dir.join("src")],
            &project_dir.join("res"),
            &[],
            Some(dex_out.clone()),
            &CompileOptions::default(),
        )
        .unwrap();
    assert_eq!(dex.path().unwrap(), dex_out);
    assert!(dex_out.is_file());
}

#[test]
#[serial]
fn aidl_stage_tolerates_zero_interface_files() {
    let root = tempfile::tempdir().unwrap();
    let sdk = common::fake_sdk(root.path());
    use_stub_path(&common::stub_path_bin(root.path()));
    let project_dir = common::scaffold_project(root.path());

    let platform = platform(&sdk);
    let stubs = platform
        .compile_aidl(&[project_dir.join("src")], &project_dir.join("gen"))
        .unwrap();
    assert!(stubs.is_empty());
}

#[test]
#[serial]
fn aidl_stubs_mirror_the_source_layout() {
    let root = tempfile::tempdir().unwrap();
    let sdk = common::fake_sdk(root.path());
    use_stub_path(&common::stub_path_bin(root.path()));
    let project_dir = common::scaffold_project(root.path());
    fs::write(
        project_dir.join("src/com/example/IRemote.aidl"),
        "package com.example;\ninterface IRemote {}\n",
    )
    .unwrap();

    let platform = platform(&sdk);
    let stubs = platform
        .compile_aidl(&[project_dir.join("src")], &project_dir.join("gen"))
        .unwrap();
    assert_eq!(stubs.len(), 1);
    assert_eq!(
        stubs[0].path().unwrap(),
        project_dir.join("gen/com/example/IRemote.java")
    );
}
