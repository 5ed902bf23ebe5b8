//! Smoke tests for the cargo-trellis binary.

use std::fs;
use std::str;

use assert_cmd::Command;
use tempfile::TempDir;

const FEATURE: &str = "\
Feature: Smoke
  Scenario: First
    Given a step
  Scenario: Second.
    Scenario Tag: slow
    When another step
";

fn write_feature(dir: &TempDir, name: &str, text: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, text).unwrap_or_else(|e| panic!("write {name}: {e}"));
    path.to_str()
        .unwrap_or_else(|| panic!("non UTF-8 path"))
        .to_string()
}

fn command() -> Command {
    let mut cmd = Command::cargo_bin("cargo-trellis").unwrap_or_else(|e| panic!("binary: {e}"));
    cmd.env_remove("TRELLIS_LOG_LEVEL");
    cmd
}

#[test]
fn lists_scenarios_when_run_through_cargo() {
    let dir = TempDir::new().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let path = write_feature(&dir, "smoke.feature", FEATURE);
    let output = command()
        .args(["trellis", "scenarios", &path, "--module", "smoke"])
        .output()
        .unwrap_or_else(|e| panic!("run: {e}"));
    assert!(output.status.success());
    let stdout = str::from_utf8(&output.stdout).unwrap_or_else(|e| panic!("utf8: {e}"));
    assert!(stdout.contains("smoke:smoke.feature:0  First"), "{stdout}");
    assert!(stdout.contains("smoke:smoke.feature:1  Second.  [slow]"), "{stdout}");
}

#[test]
fn check_exits_non_zero_on_broken_feature() {
    let dir = TempDir::new().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let path = write_feature(&dir, "broken.feature", "  Scenario: no header\n    Given x\n");
    let output = command()
        .args(["check", &path])
        .output()
        .unwrap_or_else(|e| panic!("run: {e}"));
    assert!(!output.status.success());
    let stdout = str::from_utf8(&output.stdout).unwrap_or_else(|e| panic!("utf8: {e}"));
    assert!(stdout.contains("failed to load"), "{stdout}");
}

#[test]
fn invalid_log_level_in_environment_exits_with_two() {
    let dir = TempDir::new().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let path = write_feature(&dir, "smoke.feature", FEATURE);
    let output = command()
        .env("TRELLIS_LOG_LEVEL", "chatty")
        .args(["check", &path])
        .output()
        .unwrap_or_else(|e| panic!("run: {e}"));
    assert_eq!(output.status.code(), Some(2));
}
