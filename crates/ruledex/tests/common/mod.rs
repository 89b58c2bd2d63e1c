//! Common test utilities.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Get the path to the test fixtures directory.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Specification root of the fixture project.
pub fn project_dir() -> PathBuf {
    fixtures_dir().join("project")
}

fn copy_tree(from: &Path, to: &Path) {
    std::fs::create_dir_all(to).expect("Failed to create dir");
    for entry in std::fs::read_dir(from).expect("Failed to read fixture dir") {
        let entry = entry.expect("Failed to read dir entry");
        let target = to.join(entry.file_name());
        if entry.path().is_dir() {
            copy_tree(&entry.path(), &target);
        } else {
            std::fs::copy(entry.path(), &target).expect("Failed to copy fixture");
        }
    }
}

/// Create a temporary copy of the fixture project for tests that modify it.
pub fn create_temp_project() -> tempfile::TempDir {
    let temp = tempfile::tempdir().expect("Failed to create temp dir");
    copy_tree(&project_dir(), temp.path());
    temp
}
