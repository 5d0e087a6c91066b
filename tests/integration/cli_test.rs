//! Integration tests for the trickplay CLI

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use crate::helpers::{fixture, json_lines, run_trickplay, write_file};

// ============================================================================
// Help and Version
// ============================================================================

#[test]
fn help_lists_subcommands() {
    let (stdout, _stderr, exit_code) = run_trickplay(&["--help"]);

    assert_eq!(exit_code, 0);
    assert!(stdout.contains("run"));
    assert!(stdout.contains("play"));
    assert!(stdout.contains("config"));
}

#[test]
fn version_flag_prints_package_version() {
    Command::cargo_bin("trickplay")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn missing_subcommand_is_usage_error() {
    let (_stdout, stderr, exit_code) = run_trickplay(&[]);

    assert_eq!(exit_code, 2);
    assert!(stderr.contains("Usage"));
}

// ============================================================================
// run
// ============================================================================

#[test]
fn run_prints_events_as_json_lines() {
    let script = fixture("fast_forward_to_end.toml");
    let (stdout, stderr, exit_code) = run_trickplay(&["run", script.to_str().unwrap()]);

    assert_eq!(exit_code, 0, "stderr: {}", stderr);
    insta::assert_snapshot!(stdout, @r###"
    {"event":"time_window_changed","start":0.0,"end":10.0}
    {"event":"target_rate_changed","rate":16.0}
    {"event":"target_time_updated","time":4.0}
    {"event":"thumbnail_requested","time":4.0}
    {"event":"target_time_updated","time":8.0}
    {"event":"thumbnail_requested","time":8.0}
    {"event":"target_time_updated","time":10.0}
    {"event":"thumbnail_requested","time":10.0}
    {"event":"target_rate_changed","rate":1.0}
    {"event":"end_reached"}
    {"event":"seek_completed","position":9.99}
    "###);
}

#[test]
fn run_navigates_explicit_chapters() {
    let script = fixture("chapters.toml");
    let (stdout, stderr, exit_code) = run_trickplay(&["run", script.to_str().unwrap()]);

    assert_eq!(exit_code, 0, "stderr: {}", stderr);
    let positions: Vec<f64> = json_lines(&stdout)
        .iter()
        .filter(|event| event["event"] == "seek_completed")
        .map(|event| event["position"].as_f64().unwrap())
        .collect();
    assert_eq!(positions, vec![120.0, 330.0, 120.0]);
}

#[test]
fn run_honours_config_file() {
    let dir = TempDir::new().unwrap();
    let config = write_file(
        dir.path(),
        "config.toml",
        "[playback]\nthumbnails_enabled = false\n",
    );
    let script = fixture("fast_forward_to_end.toml");

    let (stdout, _stderr, exit_code) = run_trickplay(&[
        "--config",
        config.to_str().unwrap(),
        "run",
        script.to_str().unwrap(),
    ]);

    assert_eq!(exit_code, 0);
    assert!(!stdout.contains("thumbnail_requested"));
    assert!(stdout.contains("end_reached"));
}

#[test]
fn run_missing_script_fails() {
    let (stdout, stderr, exit_code) = run_trickplay(&["run", "/nonexistent/script.toml"]);

    assert_eq!(exit_code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Failed to read script"));
}

#[test]
fn run_invalid_step_fails() {
    let script = fixture("invalid_step.toml");
    let (_stdout, stderr, exit_code) = run_trickplay(&["run", script.to_str().unwrap()]);

    assert_eq!(exit_code, 1);
    assert!(stderr.contains("Invalid script"));
}

#[test]
fn verbose_logs_go_to_stderr() {
    let script = fixture("fast_forward_to_end.toml");
    Command::cargo_bin("trickplay")
        .unwrap()
        .args(["--verbose", "run"])
        .arg(&script)
        .env_remove("TRICKPLAY_LOG")
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stdout(predicate::str::contains("end_reached"))
        .stdout(predicate::str::contains("entered simulated playback").not())
        .stderr(predicate::str::contains("entered simulated playback"));
}

// ============================================================================
// config
// ============================================================================

#[test]
fn config_shows_defaults() {
    let (stdout, _stderr, exit_code) = run_trickplay(&["config"]);

    assert_eq!(exit_code, 0);
    assert!(stdout.contains("[playback]"));
    assert!(stdout.contains("tick_interval_ms = 250"));
    assert!(stdout.contains("min_ready_state = \"current-data\""));
    assert!(stdout.contains("[session]"));
}

#[test]
fn config_reflects_overrides() {
    let dir = TempDir::new().unwrap();
    let config = write_file(
        dir.path(),
        "config.toml",
        "[playback]\ntick_interval_ms = 100\n",
    );

    let (stdout, _stderr, exit_code) =
        run_trickplay(&["--config", config.to_str().unwrap(), "config"]);

    assert_eq!(exit_code, 0);
    assert!(stdout.contains("tick_interval_ms = 100"));
    assert!(stdout.contains("proximity_threshold = 0.5"));
}

#[test]
fn config_rejects_malformed_file() {
    let dir = TempDir::new().unwrap();
    let config = write_file(dir.path(), "config.toml", "[playback\n");

    let (_stdout, stderr, exit_code) =
        run_trickplay(&["--config", config.to_str().unwrap(), "config"]);

    assert_eq!(exit_code, 1);
    assert!(stderr.contains("Failed to parse config file"));
}
