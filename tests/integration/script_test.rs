//! Integration tests for scripted sessions

use tempfile::TempDir;

use trickplay::session::{run_script, Script};
use trickplay::{Config, ControllerEvent};

use crate::helpers::{fixture, write_file};

#[test]
fn fixture_scripts_parse() {
    for name in ["fast_forward_to_end.toml", "chapters.toml"] {
        let script = Script::load(&fixture(name));
        assert!(script.is_ok(), "{} failed: {:?}", name, script.err());
    }
}

#[test]
fn invalid_fixture_is_rejected() {
    let err = Script::load(&fixture("invalid_step.toml")).unwrap_err();
    assert!(format!("{:#}", err).contains("teleport"));
}

#[test]
fn chapter_fixture_skips_advertisement() {
    let script = Script::load(&fixture("chapters.toml")).unwrap();
    let events = run_script(&script, &Config::default()).unwrap();

    let seeks: Vec<f64> = events
        .iter()
        .filter_map(|event| match event {
            ControllerEvent::SeekCompleted { position } => Some(*position),
            _ => None,
        })
        .collect();
    assert_eq!(seeks, vec![120.0, 330.0, 120.0]);
}

#[test]
fn same_script_same_events() {
    let script = Script::load(&fixture("fast_forward_to_end.toml")).unwrap();
    let first = run_script(&script, &Config::default()).unwrap();
    let second = run_script(&script, &Config::default()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn custom_tick_interval_changes_granularity() {
    let script = Script::load(&fixture("fast_forward_to_end.toml")).unwrap();
    let config = Config::from_toml_str("[playback]\ntick_interval_ms = 125\n").unwrap();
    let events = run_script(&script, &config).unwrap();

    let first_update = events.iter().find_map(|event| match event {
        ControllerEvent::TargetTimeUpdated { time } => Some(*time),
        _ => None,
    });
    assert_eq!(first_update, Some(2.0));
}

#[test]
fn bounds_script_clamps_playback() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        dir.path(),
        "bounds.toml",
        r#"
        [media]
        duration = 90.0

        [[steps]]
        action = "set_start"
        time = 10.0

        [[steps]]
        action = "set_end"
        time = 11.0

        [[steps]]
        action = "scrub"
        time = 0.0

        [[steps]]
        action = "play"

        [[steps]]
        action = "advance"
        ms = 3000
        "#,
    );

    let script = Script::load(&path).unwrap();
    let events = run_script(&script, &Config::default()).unwrap();

    assert!(events.contains(&ControllerEvent::TimeWindowChanged {
        start: 10.0,
        end: 11.0
    }));
    assert!(events.contains(&ControllerEvent::SeekCompleted { position: 10.0 }));
    assert!(events.contains(&ControllerEvent::SeekCompleted { position: 11.0 }));
    assert!(events.contains(&ControllerEvent::EndReached));
}
