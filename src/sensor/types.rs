//! Sensor and lock-action interfaces.
//!
//! The detector only needs two things from the platform: a raw light reading
//! per tick and a way to lock the session. Both are traits so the tick loop
//! can be driven by recorded data in tests and replays.

/// Result of one sensor read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorReading {
    /// A raw light level
    Value(u64),
    /// The device is busy; skip this tick
    Busy,
}

/// Fatal sensor errors. Each maps to a distinct process exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SensorError {
    /// No ambient light sensor was found
    NotFound,
    /// The sensor exists but could not be opened
    OpenFailed { code: i32, message: String },
    /// A read failed with something other than "busy"
    ReadFailed { code: i32, message: String },
}

impl SensorError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            SensorError::NotFound => -1,
            SensorError::OpenFailed { .. } => -2,
            SensorError::ReadFailed { .. } => -3,
        }
    }
}

impl std::fmt::Display for SensorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SensorError::NotFound => write!(f, "Cannot find ambient light sensor"),
            SensorError::OpenFailed { code, message } => {
                write!(f, "Failed to open ambient light sensor ({code:#x}): {message}")
            }
            SensorError::ReadFailed { code, message } => {
                write!(f, "Failed to read ambient light sensor ({code:#x}): {message}")
            }
        }
    }
}

impl std::error::Error for SensorError {}

/// A source of raw ambient light readings.
pub trait LightSensor {
    /// Read the current light level.
    fn read(&mut self) -> Result<SensorReading, SensorError>;

    /// Human-readable description of the device.
    fn describe(&self) -> String;
}

/// The OS screen-lock action. Fire-and-forget: failures are logged, not
/// returned.
pub trait ScreenLocker {
    fn lock(&mut self);
}

impl<T: LightSensor + ?Sized> LightSensor for Box<T> {
    fn read(&mut self) -> Result<SensorReading, SensorError> {
        (**self).read()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<T: ScreenLocker + ?Sized> ScreenLocker for Box<T> {
    fn lock(&mut self) {
        (**self).lock()
    }
}

/// Locker that only logs. Used for dry runs.
#[derive(Debug, Default)]
pub struct DryRunLocker;

impl ScreenLocker for DryRunLocker {
    fn lock(&mut self) {
        tracing::info!("dry run: screen lock requested");
    }
}

/// Locker that counts lock requests.
#[derive(Debug, Default)]
pub struct RecordingLocker {
    locks: u32,
}

impl RecordingLocker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn locks(&self) -> u32 {
        self.locks
    }
}

impl ScreenLocker for RecordingLocker {
    fn lock(&mut self) {
        self.locks += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = [
            SensorError::NotFound,
            SensorError::OpenFailed {
                code: 1,
                message: "denied".to_string(),
            },
            SensorError::ReadFailed {
                code: 2,
                message: "gone".to_string(),
            },
        ];
        let codes: Vec<i32> = errors.iter().map(SensorError::exit_code).collect();
        assert_eq!(codes, vec![-1, -2, -3]);
    }

    #[test]
    fn test_error_display() {
        let err = SensorError::ReadFailed {
            code: 0x10,
            message: "I/O error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to read ambient light sensor (0x10): I/O error"
        );
        assert!(SensorError::NotFound.to_string().contains("Cannot find"));
    }

    #[test]
    fn test_recording_locker() {
        let mut locker = RecordingLocker::new();
        locker.lock();
        locker.lock();
        assert_eq!(locker.locks(), 2);
    }
}
