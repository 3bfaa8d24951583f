//! Fallback for platforms without a supported light sensor.
//!
//! This exists so the crate (and binary) can compile everywhere; `replay`
//! still works on these targets.

use crate::sensor::types::{LightSensor, ScreenLocker, SensorError, SensorReading};

/// A sensor that is never present.
pub struct NoopSensor;

impl NoopSensor {
    /// Always fails with [`SensorError::NotFound`].
    pub fn open() -> Result<Self, SensorError> {
        Err(SensorError::NotFound)
    }
}

impl LightSensor for NoopSensor {
    fn read(&mut self) -> Result<SensorReading, SensorError> {
        Err(SensorError::NotFound)
    }

    fn describe(&self) -> String {
        "unsupported platform".to_string()
    }
}

/// Locker that cannot lock anything on this platform.
#[derive(Debug, Default)]
pub struct NoopLocker;

impl ScreenLocker for NoopLocker {
    fn lock(&mut self) {
        tracing::warn!("Screen locking is not supported on this platform");
    }
}
