//! CLI integration tests for gotargets.
//!
//! These tests run the real binary and check what it prints.

use std::fs;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the gotargets binary command, isolated from the caller's config.
fn gotargets(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("gotargets").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("GOTARGETS_GO_VERSION")
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join("xdg"));
    cmd
}

/// Create a temporary directory to run in.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

fn stdout_lines(output: &std::process::Output) -> Vec<String> {
    String::from_utf8(output.stdout.clone())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

// ============================================================================
// gotargets list
// ============================================================================

#[test]
fn test_list_go_1_0() {
    let tmp = temp_dir();
    let output = gotargets(&tmp)
        .args(["list", "--go-version", "go1.0.3"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 11);
    assert_eq!(lines[0], "darwin/386 (default)");
    assert_eq!(lines[10], "windows/amd64 (default)");
}

#[test]
fn test_list_marks_non_default_targets() {
    let tmp = temp_dir();
    gotargets(&tmp)
        .args(["list", "--go-version", "go1.4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("android/arm\n"))
        .stdout(predicate::str::contains("linux/amd64 (default)\n"))
        .stdout(predicate::str::contains("nacl/arm\n"));
}

#[test]
fn test_list_defaults_to_latest() {
    let tmp = temp_dir();
    gotargets(&tmp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("windows/arm64 (default)"))
        .stdout(predicate::str::contains("nacl").not());
}

#[test]
fn test_list_unrecognized_version_uses_latest() {
    let tmp = temp_dir();
    let latest = gotargets(&tmp).arg("list").output().unwrap();

    let banana = gotargets(&tmp)
        .args(["list", "--go-version", "banana"])
        .output()
        .unwrap();
    assert!(banana.status.success());
    assert_eq!(banana.stdout, latest.stdout);
}

#[test]
fn test_list_malformed_version_warns_and_uses_latest() {
    let tmp = temp_dir();
    let latest = gotargets(&tmp).arg("list").output().unwrap();

    let bad = gotargets(&tmp)
        .args(["list", "--go-version", "goBADVERSION"])
        .output()
        .unwrap();
    assert!(bad.status.success());
    assert_eq!(bad.stdout, latest.stdout);
    assert!(String::from_utf8_lossy(&bad.stderr).contains("Unable to parse current go version"));
}

#[test]
fn test_list_filters() {
    let tmp = temp_dir();
    let output = gotargets(&tmp)
        .args(["list", "--go-version", "go1.17", "--os", "ios"])
        .output()
        .unwrap();
    assert_eq!(stdout_lines(&output), ["ios/amd64", "ios/arm64"]);

    let output = gotargets(&tmp)
        .args(["list", "--go-version", "go1.17", "--arch", "riscv64"])
        .output()
        .unwrap();
    assert_eq!(stdout_lines(&output), ["linux/riscv64 (default)"]);
}

#[test]
fn test_list_default_only() {
    let tmp = temp_dir();
    let output = gotargets(&tmp)
        .args(["list", "--go-version", "go1.16", "--default-only"])
        .output()
        .unwrap();

    let lines = stdout_lines(&output);
    assert!(!lines.is_empty());
    assert!(lines.iter().all(|l| l.ends_with(" (default)")));
    assert!(!lines.iter().any(|l| l.starts_with("ios/")));
}

#[test]
fn test_list_json() {
    let tmp = temp_dir();
    let output = gotargets(&tmp)
        .args(["list", "--go-version", "go1.11", "--os", "js", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{ "os": "js", "arch": "wasm", "default": true }])
    );
}

#[test]
fn test_list_version_from_env() {
    let tmp = temp_dir();
    gotargets(&tmp)
        .args(["list", "--os", "nacl"])
        .env("GOTARGETS_GO_VERSION", "go1.13.15")
        .assert()
        .success()
        .stdout(predicate::str::contains("nacl/amd64p32"));
}

// ============================================================================
// configuration
// ============================================================================

#[test]
fn test_list_uses_project_config() {
    let tmp = temp_dir();
    fs::write(
        tmp.path().join(".gotargets.toml"),
        "[toolchain]\ngo_version = \"go1.3\"\n\n[list]\ndefault_only = true\n",
    )
    .unwrap();

    let output = gotargets(&tmp).arg("list").output().unwrap();
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 15);
    assert!(!lines.iter().any(|l| l.starts_with("nacl/")));
}

#[test]
fn test_flag_overrides_config() {
    let tmp = temp_dir();
    fs::write(
        tmp.path().join(".gotargets.toml"),
        "[toolchain]\ngo_version = \"go1.3\"\n",
    )
    .unwrap();

    gotargets(&tmp)
        .args(["list", "--go-version", "go1.17"])
        .assert()
        .success()
        .stdout(predicate::str::contains("windows/arm64"));
}

#[test]
fn test_explicit_config_missing_fails() {
    let tmp = temp_dir();
    gotargets(&tmp)
        .args(["--config", "nope.toml", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}

#[test]
fn test_invalid_project_config_is_ignored() {
    let tmp = temp_dir();
    fs::write(tmp.path().join(".gotargets.toml"), "this is = not [toml").unwrap();

    gotargets(&tmp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("windows/arm64"))
        .stderr(predicate::str::contains("Failed to load config"));
}

// ============================================================================
// gotargets releases / completions
// ============================================================================

#[test]
fn test_releases_table() {
    let tmp = temp_dir();
    let output = gotargets(&tmp).arg("releases").output().unwrap();
    assert!(output.status.success());

    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 18);
    assert!(lines[0].starts_with("RELEASE"));
    assert!(lines[1].starts_with("1.0 "));
    assert!(lines[17].contains(">=1.17, <1.18"));
}

#[test]
fn test_releases_json() {
    let tmp = temp_dir();
    let output = gotargets(&tmp).args(["releases", "--json"]).output().unwrap();

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let releases = value.as_array().unwrap();
    assert_eq!(releases.len(), 17);
    assert_eq!(releases[13]["release"], "1.14");
    assert_eq!(releases[13]["constraint"], ">=1.14, <1.15");
    assert_eq!(releases[13]["platforms"].as_array().unwrap().len(), 34);
}

#[test]
fn test_completions_bash() {
    let tmp = temp_dir();
    gotargets(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gotargets"));
}
