//! Integration tests for the CLI binary.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn cli_help() {
    let mut cmd = Command::cargo_bin("edgescan").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("edgescan"))
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn cli_version() {
    let mut cmd = Command::cargo_bin("edgescan").unwrap();
    cmd.arg("--version");
    cmd.assert().success();
}

#[test]
fn cli_no_cidr_blocks_fails_with_suggestion() {
    let mut cmd = Command::cargo_bin("edgescan").unwrap();
    cmd.arg("-q");
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("no CIDR blocks"));
}

#[test]
fn cli_rejects_top_k_below_minimum() {
    let mut cmd = Command::cargo_bin("edgescan").unwrap();
    cmd.args(["--top-k", "3", "198.51.100.0/24"]);
    cmd.assert().failure();
}

#[test]
fn cli_scans_unroutable_block_and_reports_no_clean_ips() {
    let dir = std::env::temp_dir().join(format!("edgescan-cli-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let output_path = dir.join("clean_ips.txt");

    let mut cmd = Command::cargo_bin("edgescan").unwrap();
    cmd.args([
        "-q",
        "--top-k",
        "10",
        "--output",
        output_path.to_str().unwrap(),
        "192.0.2.0/32",
    ]);
    cmd.assert().failure();
    assert!(output_path.exists());

    std::fs::remove_file(&output_path).ok();
    std::fs::remove_dir(&dir).ok();
}
