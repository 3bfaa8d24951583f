//! Repeat counting on top of gesture completions.
//!
//! A single gesture never locks the screen. The counter measures the gap
//! between consecutive events and only fires once enough completions have
//! followed each other inside the delay window.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Which ticks move the timing anchor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorPolicy {
    /// Only ticks that complete a gesture are observed; gaps are measured
    /// between completions.
    #[default]
    Completion,
    /// Every processed tick rewrites the anchor; gaps are measured from the
    /// previous tick.
    Tick,
}

/// Timing thresholds for the repeat counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatTiming {
    /// Gaps longer than this start the count over
    pub max_delay: Duration,
    /// Completions closer than this to the anchor are not counted
    pub min_join_gap: Duration,
    /// Counted completions needed to fire
    pub target: u32,
    pub policy: AnchorPolicy,
}

impl Default for RepeatTiming {
    fn default() -> Self {
        Self {
            max_delay: Duration::from_millis(1400),
            min_join_gap: Duration::from_millis(20),
            target: 2,
            policy: AnchorPolicy::Completion,
        }
    }
}

/// Counts gesture completions that follow each other within the delay window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatCounter {
    timing: RepeatTiming,
    anchor: Option<Instant>,
    count: u32,
    /// Whether the previous tick also reported completion
    in_run: bool,
}

impl RepeatCounter {
    pub fn new(timing: RepeatTiming) -> Self {
        Self {
            timing,
            anchor: None,
            count: 0,
            in_run: false,
        }
    }

    /// Observe one tick. Returns true when the lock action should fire.
    ///
    /// The first observed event only sets the anchor. The anchor is rewritten
    /// on every observed event, including the one that fires. A gesture
    /// completes on several ticks in a row; only the first tick of such a run
    /// can count, so one gesture never counts twice at any tick period.
    pub fn observe(&mut self, now: Instant, completed: bool) -> bool {
        let starts_run = completed && !self.in_run;
        self.in_run = completed;

        if !completed && self.timing.policy == AnchorPolicy::Completion {
            return false;
        }

        let mut fire = false;
        if let Some(anchor) = self.anchor {
            let elapsed = now.saturating_duration_since(anchor);

            if elapsed > self.timing.max_delay {
                self.count = 0;
            } else if starts_run && elapsed > self.timing.min_join_gap {
                self.count += 1;
                tracing::debug!(
                    count = self.count,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "gesture repeat counted"
                );
                if self.count >= self.timing.target {
                    self.count = 0;
                    fire = true;
                }
            }
        }

        self.anchor = Some(now);
        fire
    }

    /// Completions counted so far in the current run.
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn anchor(&self) -> Option<Instant> {
        self.anchor
    }

    pub fn timing(&self) -> &RepeatTiming {
        &self.timing
    }
}
