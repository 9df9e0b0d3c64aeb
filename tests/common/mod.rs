// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use oceanio::Dataset;

/// Path to a file under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(manifest_dir)
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Path to the built oceanio binary.
pub fn oceanio_bin() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    // The test binary is in target/debug/deps/
    // The oceanio binary is in target/debug/
    path.pop(); // deps
    path.pop(); // debug or release
    path.push("oceanio");
    path
}

/// Run oceanio with arguments, isolated from the caller's environment.
pub fn run(args: &[&str]) -> Output {
    let bin = oceanio_bin();
    Command::new(&bin)
        .args(args)
        .env_remove("OCEANIO_MANIFEST")
        .env_remove("OCEANIO_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|_| panic!("Failed to run {:?}", bin))
}

/// Run oceanio and assert success, returning stdout.
pub fn run_ok(args: &[&str]) -> String {
    let output = run(args);
    assert!(
        output.status.success(),
        "Command failed: {:?}\nstdout: {}\nstderr: {}",
        args,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run oceanio and assert failure, returning stderr.
pub fn run_err(args: &[&str]) -> String {
    let output = run(args);
    assert!(
        !output.status.success(),
        "Command should have failed but succeeded: {:?}",
        args
    );
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Values of a 1-D variable, NaN included.
pub fn values(dataset: &Dataset, name: &str) -> Vec<f64> {
    dataset
        .variable(name)
        .unwrap_or_else(|| panic!("variable '{name}' missing"))
        .data
        .iter()
        .copied()
        .collect()
}

/// Write `contents` to `dir/name` and return the path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}
