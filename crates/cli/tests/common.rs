// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// Nothing listens on the discard port, so probes report offline.
pub const UNREACHABLE: &str = "http://127.0.0.1:9";

pub fn outbox() -> Command {
    cargo_bin_cmd!("outbox")
}

/// Helper to create an initialized temp directory whose server is unreachable.
pub fn init_temp() -> TempDir {
    init_temp_with(UNREACHABLE)
}

/// Helper to create an initialized temp directory pointing at `base_url`.
pub fn init_temp_with(base_url: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    outbox()
        .arg("init")
        .arg("--base-url")
        .arg(base_url)
        .current_dir(temp.path())
        .assert()
        .success();
    temp
}

/// Helper to enqueue a mutation and return its id.
pub fn enqueue(temp: &TempDir, method: &str, url: &str) -> String {
    let output = outbox()
        .args(["enqueue", method, url, "-o", "json"])
        .current_dir(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    value["id"].as_str().unwrap().to_string()
}

/// Parsed `status -o json` output.
pub fn status_json(temp: &TempDir) -> serde_json::Value {
    let output = outbox()
        .args(["status", "-o", "json"])
        .current_dir(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

/// Parsed `list -o json` items.
pub fn list_json(temp: &TempDir) -> Vec<serde_json::Value> {
    let output = outbox()
        .args(["list", "-o", "json"])
        .current_dir(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    value["items"].as_array().unwrap().clone()
}
