//! The tick loop.
//!
//! [`Agent`] owns the sensor, the lock action and the detector state. Each
//! tick reads the sensor once and feeds the reading through the detector;
//! [`Agent::run`] repeats that at a fixed period until stopped.

use crate::config::Config;
use crate::core::{Detector, TickOutcome};
use crate::sensor::{LightSensor, ReplaySensor, ScreenLocker, SensorError, SensorReading};
use crate::stats::SessionStats;
use crossbeam_channel::RecvTimeoutError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How often the loop re-checks the stop flag when no tick arrives.
const STOP_POLL: Duration = Duration::from_millis(100);

/// Drives the detector from a sensor and fires the lock action.
pub struct Agent<S, L> {
    sensor: S,
    locker: L,
    detector: Detector,
    stats: SessionStats,
    interval: Duration,
}

impl<S: LightSensor, L: ScreenLocker> Agent<S, L> {
    pub fn new(config: &Config, sensor: S, locker: L) -> Self {
        Self {
            sensor,
            locker,
            detector: Detector::new(config),
            stats: SessionStats::new(),
            interval: config.update_interval,
        }
    }

    /// Run a single tick at `now`.
    ///
    /// Cooldown and busy ticks leave the detector untouched. A fatal read
    /// error is returned without locking.
    pub fn tick(&mut self, now: Instant) -> Result<TickOutcome, SensorError> {
        let outcome = self.step(now)?;
        self.stats.record(&outcome);
        Ok(outcome)
    }

    fn step(&mut self, now: Instant) -> Result<TickOutcome, SensorError> {
        if !self.detector.ready(now) {
            return Ok(TickOutcome::Cooldown);
        }

        let reading = match self.sensor.read()? {
            SensorReading::Value(reading) => reading,
            SensorReading::Busy => {
                tracing::trace!("sensor busy, skipping tick");
                return Ok(TickOutcome::Busy);
            }
        };

        let outcome = self.detector.process(reading, now);
        if outcome.is_lock() {
            self.locker.lock();
        }
        Ok(outcome)
    }

    /// Tick at the configured interval until `running` is cleared.
    ///
    /// Returns the fatal sensor error that stopped the loop, if any. The
    /// optional `observer` sees every tick outcome.
    pub fn run(
        &mut self,
        running: &Arc<AtomicBool>,
        mut observer: impl FnMut(&TickOutcome),
    ) -> Result<(), SensorError> {
        let ticker = crossbeam_channel::tick(self.interval);
        tracing::info!(
            sensor = %self.sensor.describe(),
            interval_ms = self.interval.as_millis() as u64,
            "watching ambient light"
        );

        while running.load(Ordering::SeqCst) {
            match ticker.recv_timeout(STOP_POLL) {
                Ok(now) => {
                    let outcome = self.tick(now).map_err(|e| {
                        tracing::error!(code = e.exit_code(), "{e}");
                        e
                    })?;
                    observer(&outcome);
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        Ok(())
    }

    pub fn detector(&self) -> &Detector {
        &self.detector
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    pub fn locker(&self) -> &L {
        &self.locker
    }
}

impl<L: ScreenLocker> Agent<ReplaySensor, L> {
    /// Play the whole recording on a simulated clock.
    ///
    /// Tick `k` happens at `start + k * update_interval`, so timing thresholds
    /// behave as they would live without waiting in real time. Cooldown ticks
    /// consume no readings.
    pub fn replay(
        &mut self,
        start: Instant,
        mut observer: impl FnMut(&TickOutcome),
    ) -> Result<(), SensorError> {
        let mut now = start;
        while !self.sensor.is_exhausted() {
            let outcome = self.tick(now)?;
            observer(&outcome);
            now += self.interval;
        }
        Ok(())
    }
}
