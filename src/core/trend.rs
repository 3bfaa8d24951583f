//! Trend filter over a sliding window of raw light readings.
//!
//! Each reading is compared against the truncated mean of the window it was
//! just pushed into. The signed difference (reference minus current) and the
//! previous tick's difference form a [`TrendSample`], which the gesture
//! matcher tests against trend symbols.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// A predicate over a [`TrendSample`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendSymbol {
    /// `+`: reading is below the smoothed reference (diff > 0)
    Positive,
    /// `-`: reading is above the smoothed reference (diff < 0)
    Negative,
    /// `0`: reading equals the smoothed reference
    Flat,
    /// `v`: diff dropped since the previous tick
    Falling,
    /// `^`: diff grew since the previous tick
    Rising,
}

impl TrendSymbol {
    /// All symbols, in table order.
    pub const ALL: [TrendSymbol; 5] = [
        TrendSymbol::Positive,
        TrendSymbol::Negative,
        TrendSymbol::Flat,
        TrendSymbol::Falling,
        TrendSymbol::Rising,
    ];

    /// Parse a pattern character.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(TrendSymbol::Positive),
            '-' => Some(TrendSymbol::Negative),
            '0' => Some(TrendSymbol::Flat),
            'v' => Some(TrendSymbol::Falling),
            '^' => Some(TrendSymbol::Rising),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            TrendSymbol::Positive => '+',
            TrendSymbol::Negative => '-',
            TrendSymbol::Flat => '0',
            TrendSymbol::Falling => 'v',
            TrendSymbol::Rising => '^',
        }
    }
}

impl fmt::Display for TrendSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// The filter output for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendSample {
    /// Smoothed reference minus the current reading
    pub diff: i64,
    /// `diff` from the previous tick (0 before the first one)
    pub prev_diff: i64,
}

impl TrendSample {
    pub fn new(diff: i64, prev_diff: i64) -> Self {
        Self { diff, prev_diff }
    }

    /// Check whether `symbol` holds for this sample.
    pub fn holds(&self, symbol: TrendSymbol) -> bool {
        match symbol {
            TrendSymbol::Positive => self.diff > 0,
            TrendSymbol::Negative => self.diff < 0,
            TrendSymbol::Flat => self.diff == 0,
            TrendSymbol::Falling => self.prev_diff > self.diff,
            TrendSymbol::Rising => self.diff > self.prev_diff,
        }
    }

    /// Every symbol that holds for this sample.
    pub fn symbols(&self) -> impl Iterator<Item = TrendSymbol> + '_ {
        TrendSymbol::ALL
            .into_iter()
            .filter(move |s| self.holds(*s))
    }

    /// Compact rendering such as `+v` or `0`, used in diagnostics.
    pub fn symbol_string(&self) -> String {
        self.symbols().map(TrendSymbol::as_char).collect()
    }
}

/// Sliding-window smoothing filter.
///
/// The window is filled front to back: during the startup ramp only the
/// readings pushed so far contribute to the mean, so a genuine zero reading
/// is never mistaken for an empty slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendFilter {
    /// Most recent readings, newest first
    window: VecDeque<u64>,
    capacity: usize,
    prev_diff: i64,
}

impl TrendFilter {
    /// Create a filter holding at most `capacity` readings (clamped to 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
            prev_diff: 0,
        }
    }

    /// Push a raw reading and compute this tick's trend sample.
    pub fn push(&mut self, raw: u64) -> TrendSample {
        if self.window.len() == self.capacity {
            self.window.pop_back();
        }
        self.window.push_front(raw);

        let average = self.average();
        let diff = average.wrapping_sub(raw) as i64;

        let sample = TrendSample::new(diff, self.prev_diff);
        self.prev_diff = diff;
        sample
    }

    /// Truncated mean of the readings currently held.
    pub fn average(&self) -> u64 {
        if self.window.is_empty() {
            return 0;
        }
        let sum: u128 = self.window.iter().map(|&v| u128::from(v)).sum();
        (sum / self.window.len() as u128) as u64
    }

    /// Readings currently held, newest first.
    pub fn readings(&self) -> impl Iterator<Item = u64> + '_ {
        self.window.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.window.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The diff carried into the next tick.
    pub fn prev_diff(&self) -> i64 {
        self.prev_diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_ramp_uses_only_pushed_readings() {
        let mut filter = TrendFilter::new(10);

        let first = filter.push(100);
        assert_eq!(first, TrendSample::new(0, 0));

        // (100 + 50) / 2 = 75, so diff = 25
        let second = filter.push(50);
        assert_eq!(second, TrendSample::new(25, 0));
        assert_eq!(filter.len(), 2);
    }

    #[test]
    fn test_window_eviction() {
        let mut filter = TrendFilter::new(10);

        // Cold start: ten readings are all included
        filter.push(1_000);
        for _ in 0..9 {
            filter.push(0);
        }
        assert!(filter.is_full());
        assert_eq!(filter.average(), 100);

        // The eleventh push evicts the 1000
        let sample = filter.push(0);
        assert_eq!(filter.len(), 10);
        assert_eq!(filter.average(), 0);
        assert_eq!(sample.diff, 0);
        assert!(filter.readings().all(|v| v == 0));
    }

    #[test]
    fn test_zero_reading_counts_as_sample() {
        let mut filter = TrendFilter::new(4);
        filter.push(80);
        filter.push(0);

        // (80 + 0) / 2, not 80 / 1
        assert_eq!(filter.average(), 40);
        assert_eq!(filter.len(), 2);
    }

    #[test]
    fn test_average_truncates() {
        let mut filter = TrendFilter::new(10);
        for _ in 0..4 {
            filter.push(100);
        }
        // (400 + 50) / 5 = 90
        let sample = filter.push(50);
        assert_eq!(sample.diff, 40);

        // (100 + 101) / 2 = 100, diff = -1
        let mut filter = TrendFilter::new(2);
        filter.push(100);
        assert_eq!(filter.push(101).diff, -1);
    }

    #[test]
    fn test_prev_diff_carried_between_ticks() {
        let mut filter = TrendFilter::new(10);
        for _ in 0..10 {
            filter.push(100);
        }

        let a = filter.push(50);
        assert_eq!(a, TrendSample::new(45, 0));

        let b = filter.push(50);
        assert_eq!(b, TrendSample::new(40, 45));
        assert_eq!(filter.prev_diff(), 40);
    }

    #[test]
    fn test_symbol_table() {
        let s = TrendSample::new(45, 0);
        assert!(s.holds(TrendSymbol::Positive));
        assert!(s.holds(TrendSymbol::Rising));
        assert!(!s.holds(TrendSymbol::Falling));
        assert_eq!(s.symbol_string(), "+^");

        let s = TrendSample::new(-118, 0);
        assert_eq!(s.symbol_string(), "-v");

        let s = TrendSample::new(30, 35);
        assert_eq!(s.symbol_string(), "+v");
    }

    #[test]
    fn test_consecutive_zero_diffs_are_flat_only() {
        let mut filter = TrendFilter::new(10);
        filter.push(100);
        let sample = filter.push(100);

        assert_eq!(sample, TrendSample::new(0, 0));
        assert_eq!(sample.symbols().collect::<Vec<_>>(), vec![TrendSymbol::Flat]);
    }

    #[test]
    fn test_symbol_chars() {
        for symbol in TrendSymbol::ALL {
            assert_eq!(TrendSymbol::from_char(symbol.as_char()), Some(symbol));
        }
        assert_eq!(TrendSymbol::from_char('x'), None);
    }
}
