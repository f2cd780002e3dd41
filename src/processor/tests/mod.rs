//! Integration tests for the processor module
//!
//! Runs complete jobs against small CSV files written to a temporary directory.

pub mod error_handling;

use std::path::PathBuf;
use tempfile::TempDir;

/// Write `content` to `name` inside the temporary directory
pub fn write_input(temp_dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = temp_dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// Output rows split on `delimiter`, header included
pub fn read_rows(path: &std::path::Path, delimiter: char) -> Vec<Vec<String>> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| line.split(delimiter).map(str::to_string).collect())
        .collect()
}
