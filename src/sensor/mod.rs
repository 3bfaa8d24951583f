//! Ambient light sensor access and the screen-lock action.
//!
//! This module provides platform-specific implementations of the
//! [`LightSensor`] and [`ScreenLocker`] traits, plus a replay sensor for
//! recorded data.

pub mod replay;
pub mod types;

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(target_os = "linux")]
pub mod linux;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
pub mod noop;

use std::path::Path;

// Re-export commonly used types
pub use replay::{ReplayEntry, ReplayParseError, ReplaySensor};
pub use types::{
    DryRunLocker, LightSensor, RecordingLocker, ScreenLocker, SensorError, SensorReading,
};

#[cfg(target_os = "macos")]
pub use macos::{MacOSLocker, MacOSSensor};

/// Platform-agnostic sensor type alias
#[cfg(target_os = "macos")]
pub type Sensor = MacOSSensor;

/// Platform-agnostic locker type alias
#[cfg(target_os = "macos")]
pub type Locker = MacOSLocker;

#[cfg(target_os = "linux")]
pub use linux::{LinuxLocker, LinuxSensor};

/// Platform-agnostic sensor type alias
#[cfg(target_os = "linux")]
pub type Sensor = LinuxSensor;

/// Platform-agnostic locker type alias
#[cfg(target_os = "linux")]
pub type Locker = LinuxLocker;

#[cfg(target_os = "windows")]
pub use self::windows::{WindowsLocker, WindowsSensor};

/// Platform-agnostic sensor type alias
#[cfg(target_os = "windows")]
pub type Sensor = WindowsSensor;

/// Platform-agnostic locker type alias
#[cfg(target_os = "windows")]
pub type Locker = WindowsLocker;

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
pub use noop::{NoopLocker, NoopSensor};

/// Platform-agnostic sensor type alias
#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
pub type Sensor = NoopSensor;

/// Platform-agnostic locker type alias
#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
pub type Locker = NoopLocker;

/// Open the platform sensor.
///
/// `device` overrides discovery where the platform supports it (a Linux IIO
/// device directory or channel file); elsewhere it is ignored.
#[allow(unused_variables)]
pub fn open_sensor(device: Option<&Path>) -> Result<Sensor, SensorError> {
    #[cfg(target_os = "linux")]
    if let Some(path) = device {
        return LinuxSensor::open_path(path);
    }

    Sensor::open()
}
