//! Windows implementation using the WinRT `LightSensor` API.
//!
//! Readings are reported in lux and rounded to whole units. Locking calls
//! `LockWorkStation`.

use crate::sensor::types::{LightSensor, ScreenLocker, SensorError, SensorReading};
use windows::core::Error;
use windows::Devices::Sensors::LightSensor as WinLightSensor;
use windows::Win32::System::Shutdown::LockWorkStation;

/// Default ambient light sensor.
pub struct WindowsSensor {
    sensor: WinLightSensor,
}

impl WindowsSensor {
    /// Get the default light sensor.
    pub fn open() -> Result<Self, SensorError> {
        // GetDefault yields a null object, surfaced as an error, when no
        // sensor is present.
        let sensor = WinLightSensor::GetDefault().map_err(|_| SensorError::NotFound)?;

        if let Ok(interval) = sensor.MinimumReportInterval() {
            tracing::debug!(min_report_interval_ms = interval, "opened light sensor");
        }
        Ok(Self { sensor })
    }
}

impl LightSensor for WindowsSensor {
    fn read(&mut self) -> Result<SensorReading, SensorError> {
        let reading = match self.sensor.GetCurrentReading() {
            Ok(reading) => reading,
            Err(e) => return classify_read_error(&e),
        };

        let lux = reading.IlluminanceInLux().map_err(|e| read_failed(&e))?;

        Ok(SensorReading::Value(lux.max(0.0).round() as u64))
    }

    fn describe(&self) -> String {
        self.sensor
            .DeviceId()
            .map(|id| id.to_string())
            .unwrap_or_else(|_| "default light sensor".to_string())
    }
}

/// A null reading (no sample yet) carries a success code and means busy;
/// any failure HRESULT is fatal.
fn classify_read_error(err: &Error) -> Result<SensorReading, SensorError> {
    if err.code().is_ok() {
        Ok(SensorReading::Busy)
    } else {
        Err(read_failed(err))
    }
}

fn read_failed(err: &Error) -> SensorError {
    SensorError::ReadFailed {
        code: err.code().0,
        message: err.message().to_string(),
    }
}

/// Locks the workstation.
#[derive(Debug, Default)]
pub struct WindowsLocker;

impl ScreenLocker for WindowsLocker {
    fn lock(&mut self) {
        // SAFETY: LockWorkStation takes no arguments and only posts a request.
        match unsafe { LockWorkStation() } {
            Ok(()) => tracing::info!("requested workstation lock"),
            Err(e) => tracing::warn!("LockWorkStation failed: {e}"),
        }
    }
}
