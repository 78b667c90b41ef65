//! Path utilities for the build pipeline

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{BuildError, Result};

/// Recursively collect all files with the given extension under each
/// root. Roots that do not exist contribute nothing.
pub fn find_files(roots: &[PathBuf], extension: &str) -> Vec<PathBuf> {
    let mut results = Vec::new();
    for root in roots {
        for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|e| e == extension) {
                results.push(path.to_path_buf());
            }
        }
    }
    results.sort();
    results
}

/// Expand a classpath entry list: plain jar files pass through,
/// directories are searched recursively for jars.
pub fn collect_jars(entries: &[PathBuf]) -> Vec<PathBuf> {
    let mut jars = Vec::new();
    for entry in entries {
        if entry.is_dir() {
            jars.extend(find_files(std::slice::from_ref(entry), "jar"));
        } else {
            jars.push(entry.clone());
        }
    }
    jars
}

/// Keep only the paths that exist on disk.
pub fn only_existing(paths: &[PathBuf]) -> Vec<PathBuf> {
    paths.iter().filter(|p| p.exists()).cloned().collect()
}

/// Ensure a directory exists.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)
            .map_err(|e| BuildError::io(format!("failed to create directory {}", path.display()), e))?;
    }
    Ok(())
}

/// The platform's classpath entry separator.
pub fn classpath_separator() -> &'static str {
    if cfg!(windows) {
        ";"
    } else {
        ":"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn find_files_walks_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("com/example");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("Main.java"), b"").unwrap();
        fs::write(nested.join("Other.txt"), b"").unwrap();
        fs::write(dir.path().join("Top.java"), b"").unwrap();

        let found = find_files(&[dir.path().to_path_buf()], "java");
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|p| p.extension().unwrap() == "java"));
    }

    #[test]
    fn find_files_ignores_missing_roots() {
        let found = find_files(&[PathBuf::from("/no/such/droidbuild/root")], "aidl");
        assert!(found.is_empty());
    }

    #[test]
    fn collect_jars_expands_directories() {
        let dir = tempfile::tempdir().unwrap();
        let libs = dir.path().join("libs");
        fs::create_dir(&libs).unwrap();
        fs::write(libs.join("support.jar"), b"").unwrap();
        let loose = dir.path().join("extra.jar");
        fs::write(&loose, b"").unwrap();

        let jars = collect_jars(&[libs.clone(), loose.clone()]);
        assert_eq!(jars.len(), 2);
        assert!(jars.contains(&libs.join("support.jar")));
        assert!(jars.contains(&loose));
    }
}
