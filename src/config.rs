//! Configuration for lightlock.
//!
//! Every tunable has a documented default. An optional JSON file in the user
//! config directory may override them; it is read once at startup and never
//! written by the agent.

use crate::core::gesture::GesturePattern;
use crate::core::repeat::{AnchorPolicy, RepeatTiming};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Longest allowed post-lock cooldown.
pub const MAX_LOCK_COOLDOWN: Duration = Duration::from_secs(60);

/// Main configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of readings in the smoothing window
    pub window_size: usize,

    /// Gesture to detect, as a string of trend symbols
    pub gesture: GesturePattern,

    /// Sensor polling period
    #[serde(with = "duration_ms")]
    pub update_interval: Duration,

    /// Longest gap between two gestures that still counts as a repeat
    #[serde(with = "duration_ms")]
    pub max_delay: Duration,

    /// Gaps at or below this are treated as the same gesture
    #[serde(with = "duration_ms")]
    pub min_join_gap: Duration,

    /// Repeats after the first gesture needed to lock
    pub repeat_target: u32,

    /// How long to stop reading the sensor after locking
    #[serde(with = "duration_ms")]
    pub lock_cooldown: Duration,

    /// Which ticks move the repeat counter's timing anchor
    pub anchor_policy: AnchorPolicy,

    /// Sensor device override (Linux IIO device directory)
    pub sensor_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_size: 10,
            gesture: GesturePattern::default(),
            update_interval: Duration::from_millis(10),
            max_delay: Duration::from_millis(1400),
            min_join_gap: Duration::from_millis(20),
            repeat_target: 2,
            lock_cooldown: Duration::from_secs(3),
            anchor_policy: AnchorPolicy::Completion,
            sensor_path: None,
        }
    }
}

impl Config {
    /// Load configuration from the default location, falling back to
    /// defaults when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load and validate configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        let config: Config =
            serde_json::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lightlock")
            .join("config.json")
    }

    /// Check invariants the detector relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size == 0 {
            return Err(ConfigError::Invalid(
                "window_size must be at least 1".to_string(),
            ));
        }
        if self.gesture.is_empty() {
            return Err(ConfigError::Invalid("gesture must not be empty".to_string()));
        }
        if self.update_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "update_interval must be greater than zero".to_string(),
            ));
        }
        if self.min_join_gap >= self.max_delay {
            return Err(ConfigError::Invalid(format!(
                "min_join_gap ({}ms) must be shorter than max_delay ({}ms)",
                self.min_join_gap.as_millis(),
                self.max_delay.as_millis()
            )));
        }
        if self.repeat_target == 0 {
            return Err(ConfigError::Invalid(
                "repeat_target must be at least 1".to_string(),
            ));
        }
        if self.lock_cooldown > MAX_LOCK_COOLDOWN {
            return Err(ConfigError::Invalid(format!(
                "lock_cooldown ({}ms) must not exceed {}s",
                self.lock_cooldown.as_millis(),
                MAX_LOCK_COOLDOWN.as_secs()
            )));
        }
        Ok(())
    }

    /// Timing thresholds for the repeat counter.
    pub fn repeat_timing(&self) -> RepeatTiming {
        RepeatTiming {
            max_delay: self.max_delay,
            min_join_gap: self.min_join_gap,
            target: self.repeat_target,
            policy: self.anchor_policy,
        }
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {e}"),
            ConfigError::ParseError(e) => write!(f, "Parse error: {e}"),
            ConfigError::Invalid(e) => write!(f, "Invalid configuration: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Serde support for Duration as whole milliseconds.
mod duration_ms {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
