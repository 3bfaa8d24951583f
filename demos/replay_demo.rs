//! Demonstration of the Lightlock detection pipeline on recorded data.
//!
//! This example shows how to:
//! 1. Load a recording of ambient light readings
//! 2. Run it through the detector on a simulated clock
//! 3. Inspect the trend symbols, gesture completions and the lock
//!
//! Run with: cargo run --example replay_demo
//!
//! No sensor is needed and the screen is never locked.

use std::time::Instant;

use lightlock::{
    config::Config,
    core::TickOutcome,
    sensor::{RecordingLocker, ReplaySensor},
    Agent, GESTURE_GUIDE,
};

const RECORDING: &str = include_str!("three_gestures.txt");

fn main() {
    println!("Lightlock - Replay Demo");
    println!("=======================");
    println!();

    println!("{GESTURE_GUIDE}");
    println!();

    let config = Config::default();
    let sensor = match ReplaySensor::parse(RECORDING) {
        Ok(sensor) => sensor,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    println!("Gesture: {}", config.gesture);
    println!("Readings: {}", sensor.remaining());
    println!();
    println!("{:>6} {:>8} {:>6} {:>6}  {:<7} event", "tick", "reading", "diff", "prev", "symbols");

    let mut agent = Agent::new(&config, sensor, RecordingLocker::new());
    let mut tick = 0;

    let result = agent.replay(Instant::now(), |outcome| {
        let event = match outcome {
            TickOutcome::Sample { cursor, .. } => format!("cursor {cursor}"),
            TickOutcome::Gesture { repeats, .. } => format!("gesture (repeats: {repeats})"),
            TickOutcome::Lock { .. } => "LOCK".to_string(),
            // Skip the long post-lock cooldown
            TickOutcome::Cooldown | TickOutcome::Busy => {
                tick += 1;
                return;
            }
        };

        if let TickOutcome::Sample { reading, sample, .. }
        | TickOutcome::Gesture { reading, sample, .. }
        | TickOutcome::Lock { reading, sample } = outcome
        {
            println!(
                "{tick:>6} {reading:>8} {:>6} {:>6}  {:<7} {event}",
                sample.diff,
                sample.prev_diff,
                sample.symbol_string()
            );
        }
        tick += 1;
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }

    println!();
    println!("Screen locks requested: {}", agent.locker().locks());
    println!();
    println!("{}", agent.stats().summary());
}
