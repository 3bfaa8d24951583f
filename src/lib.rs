//! Lightlock - lock the screen by waving a hand over the ambient light sensor.
//!
//! The agent polls the ambient light sensor at a fixed period, turns each
//! reading into a trend sample relative to a short moving average, and walks
//! a gesture pattern over those samples. When the gesture repeats quickly
//! enough the screen is locked.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Lightlock                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐       │
//! │  │   Sensor    │──▶│    Trend    │──▶│   Gesture   │       │
//! │  │ (platform)  │   │   Filter    │   │   Matcher   │       │
//! │  └─────────────┘   └─────────────┘   └─────────────┘       │
//! │         ▲                                    │              │
//! │         │ cooldown                           ▼              │
//! │  ┌─────────────┐                     ┌─────────────┐       │
//! │  │   Screen    │◀────────────────────│   Repeat    │       │
//! │  │   Locker    │                     │   Counter   │       │
//! │  └─────────────┘                     └─────────────┘       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use lightlock::{sensor, Agent, Config};
//! use std::sync::atomic::AtomicBool;
//! use std::sync::Arc;
//!
//! let config = Config::load().expect("invalid configuration");
//! let sensor = sensor::open_sensor(config.sensor_path.as_deref()).expect("no sensor");
//! let mut agent = Agent::new(&config, sensor, sensor::Locker::default());
//!
//! let running = Arc::new(AtomicBool::new(true));
//! agent.run(&running, |_| {}).expect("sensor failed");
//! ```

pub mod agent;
pub mod config;
pub mod core;
pub mod sensor;
pub mod stats;

// Re-export key types at crate root for convenience
pub use agent::Agent;
pub use config::{Config, ConfigError};
pub use core::{Detector, GesturePattern, TickOutcome, TrendSymbol};
pub use sensor::{LightSensor, ScreenLocker, SensorError, SensorReading};
pub use stats::SessionStats;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// How to perform the default gesture, for display to users.
pub const GESTURE_GUIDE: &str = r#"
╔══════════════════════════════════════════════════════════════════╗
║                  LIGHTLOCK - HOW TO LOCK THE SCREEN              ║
╠══════════════════════════════════════════════════════════════════╣
║                                                                  ║
║  The ambient light sensor usually sits next to the camera.       ║
║                                                                  ║
║  1. Cover the sensor with your hand                              ║
║  2. Hold it still for a moment                                   ║
║  3. Uncover it                                                   ║
║                                                                  ║
║  Do this three times in a row, each within about a second and    ║
║  a half of the last. The screen locks after the third.           ║
║                                                                  ║
║  Trend symbols used in gesture patterns:                         ║
║    +  darker than the recent average                             ║
║    -  brighter than the recent average                           ║
║    0  exactly the recent average                                 ║
║    v  brightening relative to the average                        ║
║    ^  darkening relative to the average                          ║
║                                                                  ║
║  Nothing is recorded. Readings live only in a short window.      ║
║                                                                  ║
║  Check the sensor anytime with:                                  ║
║    lightlock status                                              ║
║                                                                  ║
╚══════════════════════════════════════════════════════════════════╝
"#;
