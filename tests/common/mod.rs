//! Shared fixtures: a fake SDK whose tools are tiny shell stubs that
//! record their argv and produce the files the pipeline expects.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

#[cfg(unix)]
pub fn write_stub(dir: &Path, name: &str, script: &str) {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

/// SDK layout with stub aapt/aidl/dx/apkbuilder/zipalign. Returns the
/// SDK root.
#[cfg(unix)]
pub fn fake_sdk(root: &Path) -> PathBuf {
    let sdk = root.join("sdk");
    let platform = sdk.join("platforms").join("android-10");
    fs::create_dir_all(&platform).unwrap();
    fs::write(platform.join("android.jar"), b"").unwrap();
    fs::write(platform.join("framework.aidl"), b"").unwrap();

    let platform_tools = sdk.join("platform-tools");
    let tools = sdk.join("tools");
    fs::create_dir_all(&platform_tools).unwrap();
    fs::create_dir_all(&tools).unwrap();

    // aapt: record the argv into -F output, touch R.java under -J
    write_stub(
        &platform_tools,
        "aapt",
        r#"#!/bin/sh
args="$*"
out=""
rout=""
prev=""
for a in "$@"; do
  case "$prev" in
    -F) out="$a" ;;
    -J) rout="$a" ;;
  esac
  prev="$a"
done
if [ -n "$rout" ]; then
  mkdir -p "$rout"
  echo "public final class R {}" > "$rout/R.java"
fi
if [ -n "$out" ]; then
  echo "$args" > "$out"
fi
exit 0
"#,
    );

    write_stub(&platform_tools, "aidl", "#!/bin/sh\nexit 0\n");

    // dx: create the --output= file
    write_stub(
        &platform_tools,
        "dx",
        r#"#!/bin/sh
for a in "$@"; do
  case "$a" in
    --output=*) echo "dex $*" > "${a#--output=}" ;;
  esac
done
exit 0
"#,
    );

    // apkbuilder: first arg is the output apk
    write_stub(&tools, "apkbuilder", "#!/bin/sh\necho \"apk $*\" > \"$1\"\nexit 0\n");

    // zipalign: -f 4 <in> <out>
    write_stub(
        &tools,
        "zipalign",
        "#!/bin/sh\ncat \"$3\" > \"$4\"\necho aligned >> \"$4\"\nexit 0\n",
    );

    sdk
}

/// Directory of PATH stubs for the tools resolved outside the SDK.
#[cfg(unix)]
pub fn stub_path_bin(root: &Path) -> PathBuf {
    let bin = root.join("pathbin");
    fs::create_dir_all(&bin).unwrap();

    // javac: create a class file under the -d directory
    write_stub(
        &bin,
        "javac",
        r#"#!/bin/sh
dest=""
prev=""
for a in "$@"; do
  if [ "$prev" = "-d" ]; then dest="$a"; fi
  prev="$a"
done
mkdir -p "$dest"
echo compiled > "$dest/Main.class"
exit 0
"#,
    );

    // jarsigner: -keystore <ks> -storepass <pw> <jar> <alias>
    write_stub(&bin, "jarsigner", "#!/bin/sh\necho signed >> \"$5\"\nexit 0\n");

    bin
}

/// Replace the PATH javac stub with one that fails like a real
/// compiler: known text on stderr, exit 1.
#[cfg(unix)]
pub fn break_javac(bin: &Path) {
    write_stub(
        bin,
        "javac",
        "#!/bin/sh\necho \"Main.java:3: error: ';' expected\" >&2\nexit 1\n",
    );
}

/// Conventional project layout with one source file and two resource
/// variants. Returns the project directory.
pub fn scaffold_project(root: &Path) -> PathBuf {
    let project = root.join("app");
    fs::create_dir_all(project.join("src/com/example")).unwrap();
    fs::create_dir_all(project.join("res/values")).unwrap();
    fs::create_dir_all(project.join("res/values-en")).unwrap();
    fs::write(
        project.join("src/com/example/Main.java"),
        "package com.example; public class Main {}\n",
    )
    .unwrap();
    fs::write(
        project.join("res/values/strings.xml"),
        "<resources><string name=\"app_name\">App</string></resources>\n",
    )
    .unwrap();
    fs::write(
        project.join("res/values-en/strings.xml"),
        "<resources><string name=\"app_name\">App (en)</string></resources>\n",
    )
    .unwrap();
    fs::write(
        project.join("AndroidManifest.xml"),
        r#"<manifest xmlns:android="http://schemas.android.com/apk/res/android"
    package="com.example.app"
    android:versionCode="1"
    android:versionName="1.0"/>
"#,
    )
    .unwrap();
    project
}

/// PATH value with `bin` prepended.
pub fn path_with(bin: &Path) -> String {
    let current = std::env::var("PATH").unwrap_or_default();
    format!("{}:{}", bin.display(), current)
}
