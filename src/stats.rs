//! Session statistics.
//!
//! Counts what the tick loop did during one run. Nothing is persisted; the
//! summary is printed when the agent stops.

use crate::core::TickOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Counters for the current session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    /// Ticks dispatched by the timer
    pub ticks: u64,
    /// Readings run through the detector
    pub samples: u64,
    /// Ticks skipped because the sensor was busy
    pub busy_ticks: u64,
    /// Ticks skipped during the post-lock cooldown
    pub cooldown_ticks: u64,
    /// Ticks on which the gesture completed
    pub gesture_ticks: u64,
    /// Screen locks requested
    pub locks: u64,
    pub session_start: DateTime<Utc>,
    pub last_lock: Option<DateTime<Utc>>,
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            ticks: 0,
            samples: 0,
            busy_ticks: 0,
            cooldown_ticks: 0,
            gesture_ticks: 0,
            locks: 0,
            session_start: Utc::now(),
            last_lock: None,
        }
    }

    /// Account for one tick.
    pub fn record(&mut self, outcome: &TickOutcome) {
        self.ticks += 1;
        match outcome {
            TickOutcome::Cooldown => self.cooldown_ticks += 1,
            TickOutcome::Busy => self.busy_ticks += 1,
            TickOutcome::Sample { .. } => self.samples += 1,
            TickOutcome::Gesture { .. } => {
                self.samples += 1;
                self.gesture_ticks += 1;
            }
            TickOutcome::Lock { .. } => {
                self.samples += 1;
                self.gesture_ticks += 1;
                self.locks += 1;
                self.last_lock = Some(Utc::now());
            }
        }
    }

    pub fn session_duration_secs(&self) -> u64 {
        (Utc::now() - self.session_start).num_seconds().max(0) as u64
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let last_lock = self
            .last_lock
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "never".to_string());

        format!(
            "Session Statistics:\n\
             - Ticks: {}\n\
             - Readings processed: {}\n\
             - Busy ticks skipped: {}\n\
             - Cooldown ticks skipped: {}\n\
             - Gesture ticks: {}\n\
             - Screen locks: {} (last: {})\n\
             - Session duration: {} seconds",
            self.ticks,
            self.samples,
            self.busy_ticks,
            self.cooldown_ticks,
            self.gesture_ticks,
            self.locks,
            last_lock,
            self.session_duration_secs()
        )
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TrendSample;

    #[test]
    fn test_record_counts_by_outcome() {
        let mut stats = SessionStats::new();
        let sample = TrendSample::default();

        stats.record(&TickOutcome::Busy);
        stats.record(&TickOutcome::Cooldown);
        stats.record(&TickOutcome::Sample {
            reading: 1,
            sample,
            cursor: 0,
        });
        stats.record(&TickOutcome::Gesture {
            reading: 1,
            sample,
            repeats: 0,
        });
        stats.record(&TickOutcome::Lock { reading: 1, sample });

        assert_eq!(stats.ticks, 5);
        assert_eq!(stats.busy_ticks, 1);
        assert_eq!(stats.cooldown_ticks, 1);
        assert_eq!(stats.samples, 3);
        assert_eq!(stats.gesture_ticks, 2);
        assert_eq!(stats.locks, 1);
        assert!(stats.last_lock.is_some());
    }

    #[test]
    fn test_summary_format() {
        let stats = SessionStats::new();
        let summary = stats.summary();

        assert!(summary.contains("Readings processed: 0"));
        assert!(summary.contains("Screen locks: 0 (last: never)"));
    }
}
