//! Scripted sensor that plays back recorded readings.
//!
//! Recordings are plain text, one entry per line: a non-negative integer
//! reading, `busy` for a skipped tick, or `error` for a fatal read failure.
//! Blank lines and `#` comments are ignored.

use crate::sensor::types::{LightSensor, SensorError, SensorReading};
use std::collections::VecDeque;
use std::path::Path;

/// One scripted sensor response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayEntry {
    Reading(SensorReading),
    Error(SensorError),
}

/// A [`LightSensor`] that yields scripted entries, then `Busy` forever.
#[derive(Debug, Clone, Default)]
pub struct ReplaySensor {
    entries: VecDeque<ReplayEntry>,
    reads: u64,
}

impl ReplaySensor {
    pub fn new(entries: impl IntoIterator<Item = ReplayEntry>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
            reads: 0,
        }
    }

    /// Play back plain readings.
    pub fn from_values(values: impl IntoIterator<Item = u64>) -> Self {
        Self::new(
            values
                .into_iter()
                .map(|v| ReplayEntry::Reading(SensorReading::Value(v))),
        )
    }

    /// Parse a text recording.
    pub fn parse(text: &str) -> Result<Self, ReplayParseError> {
        let mut entries = Vec::new();

        for (index, raw_line) in text.lines().enumerate() {
            let line = raw_line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let entry = match line.to_ascii_lowercase().as_str() {
                "busy" => ReplayEntry::Reading(SensorReading::Busy),
                "error" => ReplayEntry::Error(SensorError::ReadFailed {
                    code: -1,
                    message: format!("scripted failure at line {}", index + 1),
                }),
                other => other
                    .parse::<u64>()
                    .map(|v| ReplayEntry::Reading(SensorReading::Value(v)))
                    .map_err(|_| ReplayParseError {
                        line: index + 1,
                        content: line.to_string(),
                    })?,
            };
            entries.push(entry);
        }

        Ok(Self::new(entries))
    }

    /// Load a text recording from disk.
    pub fn load(path: &Path) -> Result<Self, ReplayParseError> {
        let text = std::fs::read_to_string(path).map_err(|e| ReplayParseError {
            line: 0,
            content: e.to_string(),
        })?;
        Self::parse(&text)
    }

    /// Entries not yet played.
    pub fn remaining(&self) -> usize {
        self.entries.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of reads served so far.
    pub fn reads(&self) -> u64 {
        self.reads
    }
}

impl LightSensor for ReplaySensor {
    fn read(&mut self) -> Result<SensorReading, SensorError> {
        self.reads += 1;
        match self.entries.pop_front() {
            Some(ReplayEntry::Reading(reading)) => Ok(reading),
            Some(ReplayEntry::Error(err)) => Err(err),
            None => Ok(SensorReading::Busy),
        }
    }

    fn describe(&self) -> String {
        format!("replay ({} entries left)", self.entries.len())
    }
}

/// A line of a recording that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayParseError {
    /// 1-based line number, 0 when the file could not be read
    pub line: usize,
    pub content: String,
}

impl std::fmt::Display for ReplayParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.line == 0 {
            write!(f, "Cannot read recording: {}", self.content)
        } else {
            write!(
                f,
                "Invalid reading on line {}: {:?}",
                self.line, self.content
            )
        }
    }
}

impl std::error::Error for ReplayParseError {}
