//! The complete per-tick detection state.
//!
//! [`Detector`] owns the trend filter, the gesture matcher, the repeat
//! counter and the post-lock cooldown. It is created once at startup and
//! mutated only by the tick loop.

use crate::config::Config;
use crate::core::gesture::GestureMatcher;
use crate::core::repeat::RepeatCounter;
use crate::core::trend::{TrendFilter, TrendSample};
use std::time::{Duration, Instant};

/// What happened on a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Skipped: still cooling down after a lock
    Cooldown,
    /// Skipped: the sensor asked to retry on the next tick
    Busy,
    /// A reading was classified; no gesture completed
    Sample {
        reading: u64,
        sample: TrendSample,
        cursor: usize,
    },
    /// The gesture completed on this tick
    Gesture {
        reading: u64,
        sample: TrendSample,
        repeats: u32,
    },
    /// Enough repeats: the screen should lock now
    Lock { reading: u64, sample: TrendSample },
}

impl TickOutcome {
    /// Whether this tick changed any detector state.
    pub fn was_processed(&self) -> bool {
        !matches!(self, TickOutcome::Cooldown | TickOutcome::Busy)
    }

    pub fn is_gesture(&self) -> bool {
        matches!(self, TickOutcome::Gesture { .. } | TickOutcome::Lock { .. })
    }

    pub fn is_lock(&self) -> bool {
        matches!(self, TickOutcome::Lock { .. })
    }
}

/// Trend filter, gesture matcher and repeat counter in one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detector {
    filter: TrendFilter,
    matcher: GestureMatcher,
    counter: RepeatCounter,
    cooldown: Duration,
    cooldown_until: Option<Instant>,
}

impl Detector {
    pub fn new(config: &Config) -> Self {
        Self {
            filter: TrendFilter::new(config.window_size),
            matcher: GestureMatcher::new(config.gesture.clone()),
            counter: RepeatCounter::new(config.repeat_timing()),
            cooldown: config.lock_cooldown,
            cooldown_until: None,
        }
    }

    /// Whether the detector accepts ticks at `now`.
    ///
    /// After a lock, ticks are refused until the cooldown has elapsed so the
    /// login window can settle. An expired cooldown is cleared here.
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.cooldown_until {
            Some(until) if now < until => false,
            Some(_) => {
                tracing::debug!("lock cooldown over, resuming detection");
                self.cooldown_until = None;
                true
            }
            None => true,
        }
    }

    /// Run one raw reading through the pipeline.
    pub fn process(&mut self, reading: u64, now: Instant) -> TickOutcome {
        let sample = self.filter.push(reading);
        let completed = self.matcher.advance(sample);

        tracing::trace!(
            reading,
            diff = sample.diff,
            prev_diff = sample.prev_diff,
            symbols = %sample.symbol_string(),
            cursor = self.matcher.cursor(),
            "sample"
        );

        if self.counter.observe(now, completed) {
            self.cooldown_until = Some(now + self.cooldown);
            tracing::info!(
                cooldown_ms = self.cooldown.as_millis() as u64,
                "gesture repeated, locking screen"
            );
            return TickOutcome::Lock { reading, sample };
        }

        if completed {
            tracing::debug!(repeats = self.counter.count(), "gesture completed");
            TickOutcome::Gesture {
                reading,
                sample,
                repeats: self.counter.count(),
            }
        } else {
            TickOutcome::Sample {
                reading,
                sample,
                cursor: self.matcher.cursor(),
            }
        }
    }

    pub fn filter(&self) -> &TrendFilter {
        &self.filter
    }

    pub fn matcher(&self) -> &GestureMatcher {
        &self.matcher
    }

    pub fn counter(&self) -> &RepeatCounter {
        &self.counter
    }

    pub fn cooldown_until(&self) -> Option<Instant> {
        self.cooldown_until
    }
}
