//! Linux implementation using the IIO sysfs interface.
//!
//! Laptop ambient light sensors show up as IIO devices under
//! `/sys/bus/iio/devices`. The first device exposing an illuminance channel
//! is used. Locking goes through `loginctl lock-session`.

use crate::sensor::types::{LightSensor, ScreenLocker, SensorError, SensorReading};
use std::fs::File;
use std::io::{ErrorKind, Read, Seek};
use std::path::{Path, PathBuf};
use std::process::Command;

const IIO_DEVICES: &str = "/sys/bus/iio/devices";

/// Channel files tried in order, most to least preferred.
const CHANNELS: [&str; 3] = [
    "in_illuminance_raw",
    "in_illuminance_input",
    "in_intensity_both_raw",
];

const EBUSY: i32 = 16;

/// Ambient light sensor backed by an IIO channel file.
pub struct LinuxSensor {
    path: PathBuf,
    file: File,
    buf: String,
}

impl LinuxSensor {
    /// Open the first IIO light sensor found.
    pub fn open() -> Result<Self, SensorError> {
        let devices = std::fs::read_dir(IIO_DEVICES).map_err(|_| SensorError::NotFound)?;

        let mut device_dirs: Vec<PathBuf> = devices
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .collect();
        device_dirs.sort();

        let channel = device_dirs
            .iter()
            .find_map(|dir| find_channel(dir))
            .ok_or(SensorError::NotFound)?;

        Self::open_channel(channel)
    }

    /// Open a specific device directory or channel file.
    pub fn open_path(path: &Path) -> Result<Self, SensorError> {
        if path.is_dir() {
            let channel = find_channel(path).ok_or(SensorError::NotFound)?;
            Self::open_channel(channel)
        } else if path.exists() {
            Self::open_channel(path.to_path_buf())
        } else {
            Err(SensorError::NotFound)
        }
    }

    fn open_channel(path: PathBuf) -> Result<Self, SensorError> {
        let file = File::open(&path).map_err(|e| SensorError::OpenFailed {
            code: e.raw_os_error().unwrap_or(-1),
            message: format!("{}: {e}", path.display()),
        })?;

        tracing::debug!(path = %path.display(), "opened IIO light sensor");
        Ok(Self {
            path,
            file,
            buf: String::with_capacity(16),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn find_channel(dir: &Path) -> Option<PathBuf> {
    CHANNELS
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.exists())
}

fn is_busy(err: &std::io::Error) -> bool {
    err.kind() == ErrorKind::WouldBlock || err.raw_os_error() == Some(EBUSY)
}

/// Parse a sysfs value. `_input` channels may report fractional lux.
fn parse_level(text: &str) -> Option<u64> {
    let text = text.trim();
    text.parse::<u64>().ok().or_else(|| {
        text.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v.round() as u64)
    })
}

impl LightSensor for LinuxSensor {
    fn read(&mut self) -> Result<SensorReading, SensorError> {
        self.buf.clear();

        let result = self
            .file
            .rewind()
            .and_then(|_| self.file.read_to_string(&mut self.buf));

        match result {
            Ok(_) => parse_level(&self.buf)
                .map(SensorReading::Value)
                .ok_or_else(|| SensorError::ReadFailed {
                    code: -1,
                    message: format!("unexpected value {:?}", self.buf.trim()),
                }),
            Err(e) if is_busy(&e) => Ok(SensorReading::Busy),
            Err(e) => Err(SensorError::ReadFailed {
                code: e.raw_os_error().unwrap_or(-1),
                message: e.to_string(),
            }),
        }
    }

    fn describe(&self) -> String {
        format!("IIO {}", self.path.display())
    }
}

/// Locks the current session through systemd-logind.
#[derive(Debug, Default)]
pub struct LinuxLocker;

impl ScreenLocker for LinuxLocker {
    fn lock(&mut self) {
        match Command::new("loginctl").arg("lock-session").status() {
            Ok(status) if status.success() => tracing::info!("requested session lock"),
            Ok(status) => tracing::warn!("loginctl lock-session exited with {status}"),
            Err(e) => tracing::warn!("Failed to run loginctl lock-session: {e}"),
        }
    }
}
