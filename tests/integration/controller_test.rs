//! Integration tests for the playback controller through the public API

use std::time::Duration;

use trickplay::config::{Config, PlaybackConfig};
use trickplay::host::{ManualScheduler, MediaEngine, MediaEvent, ReadyState, SimulatedEngine};
use trickplay::player::playback::{MarkerKind, Provenance, RateState};
use trickplay::session::SimSession;
use trickplay::{ControllerError, ControllerEvent, PlaybackController, Subscription};

fn session(engine: SimulatedEngine) -> (SimSession, Subscription) {
    let mut session = SimSession::new(engine, &Config::default());
    let events = session.subscribe();
    session.open();
    events.drain();
    (session, events)
}

fn marker_times(events: &[ControllerEvent]) -> Vec<f64> {
    events
        .iter()
        .filter_map(|event| match event {
            ControllerEvent::MarkerReached { marker } => Some(marker.time),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Rate ladder
// ============================================================================

#[test]
fn ladder_from_normal_playback() {
    let (mut s, events) = session(SimulatedEngine::new(600.0));
    let c = s.controller_mut();

    let mut rates = Vec::new();
    for _ in 0..8 {
        c.fast_forward();
        rates.push(c.target_playback_rate());
    }

    assert_eq!(rates, vec![0.5, 2.0, 4.0, 8.0, 16.0, 32.0, 64.0, 128.0]);
    assert_eq!(c.rate_state(), RateState::SimulatedFastForward(128.0));

    let announced: Vec<f64> = events
        .drain()
        .into_iter()
        .filter_map(|event| match event {
            ControllerEvent::TargetRateChanged { rate } => Some(rate),
            _ => None,
        })
        .collect();
    assert_eq!(announced, rates);
}

#[test]
fn slow_motion_is_simulated() {
    let (mut s, _events) = session(SimulatedEngine::new(600.0));
    s.controller_mut().fast_forward();

    assert_eq!(s.controller().rate_state(), RateState::SlowMotion(0.5));
    s.advance(Duration::from_secs(4));

    assert!((s.controller().target_current_time() - 2.0).abs() < 1e-9);
    assert_eq!(s.controller().engine().rate(), 0.0);
}

#[test]
fn buffering_engine_blocks_trick_play() {
    let mut engine = SimulatedEngine::new(600.0);
    engine.set_ready_state(ReadyState::Metadata);
    let (mut s, events) = session(engine);

    s.controller_mut().fast_forward();
    s.controller_mut().rewind();

    assert!(!s.controller().is_simulating());
    assert!(events.drain().is_empty());
}

// ============================================================================
// Simulation and reconciliation
// ============================================================================

#[test]
fn virtual_time_advances_one_second_per_tick_at_4x() {
    let (mut s, events) = session(SimulatedEngine::new(600.0));
    for _ in 0..3 {
        s.controller_mut().fast_forward();
    }
    events.drain();

    s.advance(Duration::from_millis(750));

    let times: Vec<f64> = events
        .drain()
        .into_iter()
        .filter_map(|event| match event {
            ControllerEvent::TargetTimeUpdated { time } => Some(time),
            _ => None,
        })
        .collect();
    assert_eq!(times, vec![1.0, 2.0, 3.0]);
}

#[test]
fn returning_to_normal_reconciles_engine_position() {
    let (mut s, _events) = session(SimulatedEngine::new(600.0));
    s.controller_mut().fast_forward();
    s.controller_mut().fast_forward();
    s.controller_mut().fast_forward();
    s.advance(Duration::from_secs(5));

    // 4x → 2x → 0.5x → 1x
    s.controller_mut().rewind();
    s.controller_mut().rewind();
    s.controller_mut().rewind();
    assert!(!s.controller().is_simulating());
    assert_eq!(s.controller().engine().seeks(), vec![20.0]);

    s.advance(Duration::ZERO);
    assert_eq!(s.controller().engine().position(), 20.0);
    assert!(!s.controller().engine().is_paused());
}

#[test]
fn end_boundary_issues_one_clamp_seek() {
    let (mut s, events) = session(SimulatedEngine::new(30.0));
    s.controller_mut().set_playback_rate(64.0);

    s.advance(Duration::from_secs(3));

    let seeks = s.controller().engine().seeks();
    assert_eq!(seeks.len(), 1);
    assert!((seeks[0] - 29.99).abs() < 1e-9);

    let events = events.drain();
    let ends = events
        .iter()
        .filter(|event| **event == ControllerEvent::EndReached)
        .count();
    assert_eq!(ends, 1);
    assert!(s.controller().engine().is_paused());
}

#[test]
fn rewind_stops_at_overridden_start() {
    let (mut s, events) = session(SimulatedEngine::new(600.0));
    s.controller_mut().set_start_time(100.0).unwrap();
    s.controller_mut().seek(110.0).unwrap();
    s.advance(Duration::ZERO);

    s.controller_mut().set_playback_rate(-16.0);
    s.advance(Duration::from_millis(750));
    s.advance(Duration::ZERO);

    assert!(!s.controller().is_simulating());
    assert!(events.drain().contains(&ControllerEvent::StartReached));
    assert!((s.controller().engine().position() - 100.01).abs() < 1e-9);
    assert!(!s.controller().engine().is_paused());
}

#[test]
fn live_stream_catches_up_without_end_event() {
    let (mut s, events) = session(SimulatedEngine::live(100.0));
    s.controller_mut().fast_forward();
    s.controller_mut().fast_forward();

    s.advance(Duration::from_millis(500));

    assert!(!s.controller().is_simulating());
    assert!(!events.drain().contains(&ControllerEvent::EndReached));
    assert!(!s.controller().engine().is_paused());
    let edge = s.controller().engine().live_edge().unwrap();
    assert!(s.controller().engine().position() <= edge);
}

// ============================================================================
// Seeking
// ============================================================================

#[test]
fn user_and_programmatic_seeks_differ_while_buffering() {
    let mut engine = SimulatedEngine::new(600.0);
    engine.set_ready_state(ReadyState::Metadata);
    let (mut s, _events) = session(engine);

    s.controller_mut().scrub_to(200.0).unwrap();
    assert!(s.controller().engine().seeks().is_empty());

    s.controller_mut().seek(200.0).unwrap();
    assert_eq!(s.controller().engine().seeks(), vec![200.0]);
}

#[test]
fn engine_refusal_surfaces_only_for_programmatic_seeks() {
    let mut engine = SimulatedEngine::new(600.0);
    engine.set_ready_state(ReadyState::Nothing);
    let mut controller =
        PlaybackController::new(engine, ManualScheduler::new(), PlaybackConfig::default());

    let err = controller.seek(10.0).unwrap_err();
    assert!(matches!(err, ControllerError::SeekRejected { target, .. } if target == 0.0));
    assert!(controller.scrub_to(10.0).is_ok());
}

// ============================================================================
// Bounds
// ============================================================================

#[test]
fn bounds_round_trip_across_sources() {
    let (mut s, _events) = session(SimulatedEngine::new(120.0));
    s.controller_mut().set_start_time(5.0).unwrap();
    s.controller_mut().set_end_time(50.0).unwrap();

    s.controller_mut().load_source();
    s.controller_mut().engine_mut().load(900.0);
    s.advance(Duration::ZERO);

    let window = s.controller().time_window();
    assert_eq!(window.start_time(), 5.0);
    assert_eq!(window.end_time(), 50.0);
    assert_eq!(window.end().provenance, Provenance::Overridden);

    s.controller_mut().clear_end_time();
    assert_eq!(s.controller().end_time(), 900.0);
    assert_eq!(s.controller().time_window().end().provenance, Provenance::Derived);
}

#[test]
fn position_stays_within_bounds_during_playback() {
    let (mut s, events) = session(SimulatedEngine::new(120.0));
    s.controller_mut().set_end_time(2.0).unwrap();
    s.controller_mut().play();

    s.advance(Duration::from_secs(4));

    let position = s.controller().engine().position();
    assert!(position <= 2.0, "position {} escaped the window", position);
    assert!(s.controller().engine().is_paused());
    assert!(events.drain().contains(&ControllerEvent::EndReached));
}

// ============================================================================
// Markers
// ============================================================================

#[test]
fn markers_fire_in_order_during_playback() {
    let (mut s, events) = session(SimulatedEngine::new(120.0));
    for time in [10.0, 10.2, 10.3, 20.0] {
        s.controller_mut()
            .add_marker(time, MarkerKind::Custom, serde_json::Value::Null, None)
            .unwrap();
    }
    s.controller_mut().seek(9.0).unwrap();
    s.advance(Duration::ZERO);
    s.controller_mut().play();

    s.advance(Duration::from_secs(2));

    assert_eq!(marker_times(&events.drain()), vec![10.0, 10.2, 10.3]);
}

#[test]
fn markers_skipped_by_seek_do_not_fire() {
    let (mut s, events) = session(SimulatedEngine::new(120.0));
    s.controller_mut()
        .add_marker(10.0, MarkerKind::Custom, serde_json::Value::Null, None)
        .unwrap();
    s.controller_mut().play();
    s.controller_mut().seek(50.0).unwrap();

    s.advance(Duration::from_secs(2));

    assert!(marker_times(&events.drain()).is_empty());
}

#[test]
fn markers_stay_silent_during_fast_forward() {
    let (mut s, events) = session(SimulatedEngine::new(120.0));
    s.controller_mut()
        .add_marker(3.0, MarkerKind::Chapter, serde_json::Value::Null, None)
        .unwrap();
    s.controller_mut().set_playback_rate(8.0);

    s.advance(Duration::from_secs(1));

    assert!(marker_times(&events.drain()).is_empty());
}

#[test]
fn marker_payload_reaches_listeners() {
    let (mut s, events) = session(SimulatedEngine::new(120.0));
    s.controller_mut()
        .add_marker(
            0.5,
            MarkerKind::Advertisement,
            serde_json::json!({ "sponsor": "acme" }),
            Some("ad-break".to_string()),
        )
        .unwrap();
    s.controller_mut().play();

    s.advance(Duration::from_millis(400));

    let reached: Vec<_> = events
        .drain()
        .into_iter()
        .filter_map(|event| match event {
            ControllerEvent::MarkerReached { marker } => Some(marker),
            _ => None,
        })
        .collect();
    assert_eq!(reached.len(), 1);
    assert_eq!(reached[0].kind, MarkerKind::Advertisement);
    assert_eq!(reached[0].payload["sponsor"], "acme");
    assert_eq!(reached[0].style.as_deref(), Some("ad-break"));
}

#[test]
fn default_chapters_cover_long_media_only() {
    let (long, _e1) = session(SimulatedEngine::new(120.0));
    let times: Vec<f64> = long
        .controller()
        .default_markers()
        .iter()
        .map(|m| m.time)
        .collect();
    assert_eq!(times.len(), 11);
    assert_eq!(times.first().copied(), Some(0.0));
    assert_eq!(times.last().copied(), Some(120.0));

    let (short, _e2) = session(SimulatedEngine::new(45.0));
    assert!(short.controller().default_markers().is_empty());

    let (live, _e3) = session(SimulatedEngine::live(3600.0));
    assert!(live.controller().default_markers().is_empty());
}

#[test]
fn media_end_is_reported() {
    let (mut s, events) = session(SimulatedEngine::new(1.0));
    s.controller_mut().play();
    s.advance(Duration::from_secs(2));

    assert!(events.drain().contains(&ControllerEvent::MediaEnded));
}

#[test]
fn duration_change_announces_window() {
    let mut controller = PlaybackController::new(
        SimulatedEngine::new(0.0),
        ManualScheduler::new(),
        PlaybackConfig::default(),
    );
    let events = controller.subscribe();
    controller.handle_media_event(MediaEvent::DurationChanged(75.0));

    assert_eq!(
        events.drain(),
        vec![ControllerEvent::TimeWindowChanged {
            start: 0.0,
            end: 75.0
        }]
    );
}
