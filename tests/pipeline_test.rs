//! Integration tests for the read-classify-lock pipeline, driven by recordings

use lightlock::config::Config;
use lightlock::core::{AnchorPolicy, TickOutcome};
use lightlock::sensor::{RecordingLocker, ReplaySensor, SensorError};
use lightlock::Agent;
use std::time::{Duration, Instant};

const THREE_GESTURES: &str = include_str!("../demos/three_gestures.txt");

fn replay(
    config: &Config,
    recording: &str,
) -> (Agent<ReplaySensor, RecordingLocker>, Vec<TickOutcome>) {
    let sensor = ReplaySensor::parse(recording).expect("Failed to parse recording");
    let mut agent = Agent::new(config, sensor, RecordingLocker::new());

    let mut outcomes = Vec::new();
    let result = agent.replay(Instant::now(), |outcome| outcomes.push(*outcome));
    assert!(result.is_ok());

    (agent, outcomes)
}

#[test]
fn test_three_gestures_lock_once() {
    let (agent, outcomes) = replay(&Config::default(), THREE_GESTURES);

    assert_eq!(agent.locker().locks(), 1);

    let lock_tick = outcomes.iter().position(TickOutcome::is_lock);
    assert_eq!(lock_tick, Some(58));

    // 3 s of 10 ms ticks after the lock are skipped without reading
    let stats = agent.stats();
    assert_eq!(stats.samples, 67);
    assert_eq!(stats.locks, 1);
    assert_eq!(stats.cooldown_ticks, 299);
    assert!(outcomes[59..358]
        .iter()
        .all(|o| *o == TickOutcome::Cooldown));
}

#[test]
fn test_single_gesture_does_not_lock() {
    // Baseline plus the first gesture and its settle period
    let recording: String = THREE_GESTURES
        .lines()
        .filter(|l| !l.starts_with('#'))
        .take(29)
        .map(|l| format!("{l}\n"))
        .collect();

    let (agent, outcomes) = replay(&Config::default(), &recording);

    assert_eq!(agent.locker().locks(), 0);
    assert_eq!(outcomes.iter().filter(|o| o.is_gesture()).count(), 7);
    assert_eq!(agent.detector().counter().count(), 0);
}

#[test]
fn test_busy_ticks_in_baseline_are_skipped() {
    let recording = format!("busy\nbusy\n{THREE_GESTURES}");
    let (agent, outcomes) = replay(&Config::default(), &recording);

    assert_eq!(agent.locker().locks(), 1);
    assert_eq!(agent.stats().busy_ticks, 2);
    assert_eq!(outcomes.iter().position(TickOutcome::is_lock), Some(60));
}

#[test]
fn test_fatal_error_stops_replay_without_lock() {
    let recording = format!("{}\nerror\n", &THREE_GESTURES[..THREE_GESTURES.len() / 2]);
    let sensor = ReplaySensor::parse(&recording).expect("Failed to parse recording");
    let mut agent = Agent::new(&Config::default(), sensor, RecordingLocker::new());

    let err = agent.replay(Instant::now(), |_| {}).unwrap_err();

    assert!(matches!(err, SensorError::ReadFailed { .. }));
    assert_eq!(err.exit_code(), -3);
    assert_eq!(agent.locker().locks(), 0);
}

#[test]
fn test_short_max_delay_never_locks() {
    let config = Config {
        max_delay: Duration::from_millis(100),
        ..Config::default()
    };
    config.validate().expect("config should be valid");

    let (agent, outcomes) = replay(&config, THREE_GESTURES);

    assert_eq!(agent.locker().locks(), 0);
    assert!(outcomes.iter().any(TickOutcome::is_gesture));
}

#[test]
fn test_tick_anchor_policy_never_counts_at_fast_ticks() {
    // Every tick moves the anchor, so completions are always 10 ms apart
    let config = Config {
        anchor_policy: AnchorPolicy::Tick,
        ..Config::default()
    };

    let (agent, _) = replay(&config, THREE_GESTURES);

    assert_eq!(agent.locker().locks(), 0);
    assert_eq!(agent.stats().samples, 67);
}

#[test]
fn test_custom_gesture_from_config_file() {
    let dir = std::env::temp_dir().join(format!("lightlock-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.json");
    std::fs::write(&path, r#"{ "gesture": "+^^^", "repeat_target": 1 }"#).unwrap();

    let config = Config::load_from(&path).expect("Failed to load config");
    std::fs::remove_dir_all(&dir).unwrap();

    assert_eq!(config.gesture.to_string(), "+^^^");
    assert_eq!(config.window_size, 10);

    // Two darkenings separated by a recovery
    let recording = "100\n100\n100\n100\n100\n100\n100\n100\n100\n100\n\
                     80\n60\n40\n20\n\
                     100\n100\n100\n100\n100\n100\n100\n100\n100\n100\n\
                     80\n60\n40\n20\n";
    let (agent, outcomes) = replay(&config, recording);

    assert_eq!(outcomes.iter().filter(|o| o.is_gesture()).count(), 2);
    assert_eq!(agent.locker().locks(), 1);
}

#[test]
fn test_single_gesture_never_locks_at_slow_ticks() {
    let first_gesture: String = THREE_GESTURES
        .lines()
        .filter(|l| !l.starts_with('#'))
        .take(29)
        .map(|l| format!("{l}\n"))
        .collect();

    for interval_ms in [30, 50, 100, 200] {
        for anchor_policy in [AnchorPolicy::Completion, AnchorPolicy::Tick] {
            let config = Config {
                update_interval: Duration::from_millis(interval_ms),
                anchor_policy,
                ..Config::default()
            };
            config.validate().expect("config should be valid");

            let (agent, outcomes) = replay(&config, &first_gesture);

            assert!(outcomes.iter().any(TickOutcome::is_gesture));
            assert_eq!(
                agent.locker().locks(),
                0,
                "{interval_ms}ms ticks with {anchor_policy:?} policy"
            );
        }
    }
}

#[test]
fn test_three_gestures_still_lock_at_slower_ticks() {
    let config = Config {
        update_interval: Duration::from_millis(50),
        ..Config::default()
    };

    let (agent, _) = replay(&config, THREE_GESTURES);

    assert_eq!(agent.locker().locks(), 1);
}
