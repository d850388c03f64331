//! Smoke tests for the pixelcalc binary

#![allow(deprecated)] // Command::cargo_bin
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a command for the pixelcalc binary with a clean environment
fn pixelcalc() -> Command {
    let mut cmd = Command::cargo_bin("pixelcalc").expect("pixelcalc binary should exist");
    cmd.env_remove("PIXELCALC_LOG").env_remove("PIXELCALC_CONFIG");
    cmd
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    pixelcalc()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_lists_subcommands() {
    pixelcalc()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("tui"))
        .stdout(predicate::str::contains("eval"))
        .stdout(predicate::str::contains("prank"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_no_args_fails() {
    pixelcalc().assert().failure();
}

#[test]
fn test_tui_help() {
    pixelcalc()
        .args(["tui", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--widget"));
}

// ============================================================================
// Eval Tests
// ============================================================================

#[test]
fn test_eval_left_to_right() {
    pixelcalc()
        .args(["eval", "3", "+", "4", "×", "2", "="])
        .assert()
        .success()
        .stdout("14\n");
}

#[test]
fn test_eval_division_by_zero_shows_marker() {
    pixelcalc()
        .args(["eval", "5", "÷", "0", "="])
        .assert()
        .success()
        .stdout("Error\n");
}

#[test]
fn test_eval_factorial_limit() {
    pixelcalc()
        .args(["eval", "5", "x!"])
        .assert()
        .success()
        .stdout("120\n");
    pixelcalc()
        .args(["eval", "171", "x!"])
        .assert()
        .success()
        .stdout("Error\n");
}

#[test]
fn test_eval_radians_flag() {
    pixelcalc()
        .args(["--angle", "rad", "eval", "π", "÷", "2", "=", "sin"])
        .assert()
        .success()
        .stdout("1\n");
}

#[test]
fn test_eval_negative_number_token() {
    pixelcalc()
        .args(["eval", "-3", "+", "5", "="])
        .assert()
        .success()
        .stdout("2\n");
}

#[test]
fn test_eval_history_json() {
    pixelcalc()
        .args(["eval", "--history-json", "1", "+", "1", "=", "2", "×", "3", "="])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("6\n"))
        .stdout(predicate::str::contains("\"expression\""));
}

#[test]
fn test_eval_unknown_key_fails() {
    pixelcalc()
        .args(["eval", "2", "bogus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bogus"));
}

// ============================================================================
// Prank Tests
// ============================================================================

#[test]
fn test_prank_answer() {
    pixelcalc()
        .args(["--seed", "3", "prank", "9/3"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("9÷3\n"))
        .stdout(predicate::str::contains("ANSWER'S READY"))
        .stdout(predicate::str::contains("STUPID ANSWER: "));
}

#[test]
fn test_prank_seeded_output_repeats() {
    let first = pixelcalc().args(["--seed", "8", "prank"]).output().unwrap();
    let second = pixelcalc().args(["--seed", "8", "prank"]).output().unwrap();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_prank_rejects_bad_input() {
    pixelcalc()
        .args(["prank", "two+two"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid argument"));
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_config_shows_overrides() {
    pixelcalc()
        .args(["--seed", "42", "--angle", "grad", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("seed: 42"))
        .stdout(predicate::str::contains("angle_mode: GRAD"));
}

#[test]
fn test_config_file_is_loaded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pixelcalc.yaml");
    fs::write(&path, "calculator:\n  angle_mode: RAD\n  mode: REG\n").unwrap();

    pixelcalc()
        .args(["--config", path.to_str().unwrap(), "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("angle_mode: RAD"))
        .stdout(predicate::str::contains("mode: REG"));
}

#[test]
fn test_config_file_applies_to_eval() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pixelcalc.yaml");
    fs::write(&path, "calculator:\n  angle_mode: RAD\n").unwrap();

    pixelcalc()
        .args(["--config", path.to_str().unwrap(), "eval", "--full", "0", "cos"])
        .assert()
        .success()
        .stdout(predicate::str::contains("RAD COMP"));
}

#[test]
fn test_bad_config_file_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.yaml");
    fs::write(&path, "calculator: [").unwrap();

    pixelcalc()
        .args(["--config", path.to_str().unwrap(), "config"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("broken.yaml"));
}

#[test]
fn test_log_file_receives_events() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("calc.log");

    pixelcalc()
        .args(["-vv", "--log-file", log.to_str().unwrap(), "eval", "1", "+", "2", "="])
        .assert()
        .success()
        .stdout("3\n");

    let contents = fs::read_to_string(&log).unwrap();
    assert!(contents.contains("evaluating key script"));
}
