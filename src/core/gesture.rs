//! Gesture pattern matching over trend samples.
//!
//! A gesture is a fixed sequence of [`TrendSymbol`]s. The matcher keeps a
//! cursor into the pattern and moves it one step per tick.

use crate::core::trend::{TrendSample, TrendSymbol};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Default gesture: cover, hold still, uncover.
pub const DEFAULT_GESTURE: &str = "+vvv000-^^^";

/// An immutable, non-empty sequence of trend symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GesturePattern {
    symbols: Vec<TrendSymbol>,
}

impl GesturePattern {
    pub fn new(symbols: Vec<TrendSymbol>) -> Result<Self, PatternError> {
        if symbols.is_empty() {
            return Err(PatternError::Empty);
        }
        Ok(Self { symbols })
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbol at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<TrendSymbol> {
        self.symbols.get(index).copied()
    }

    pub fn symbols(&self) -> &[TrendSymbol] {
        &self.symbols
    }
}

impl Default for GesturePattern {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_GESTURE
                .chars()
                .filter_map(TrendSymbol::from_char)
                .collect(),
        }
    }
}

impl FromStr for GesturePattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbols = s
            .chars()
            .enumerate()
            .map(|(position, c)| {
                TrendSymbol::from_char(c).ok_or(PatternError::UnknownSymbol { symbol: c, position })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(symbols)
    }
}

impl fmt::Display for GesturePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.symbols {
            write!(f, "{symbol}")?;
        }
        Ok(())
    }
}

impl Serialize for GesturePattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GesturePattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Gesture pattern errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    Empty,
    UnknownSymbol { symbol: char, position: usize },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::Empty => write!(f, "Gesture pattern is empty"),
            PatternError::UnknownSymbol { symbol, position } => write!(
                f,
                "Unknown gesture symbol '{symbol}' at position {position} (expected one of + - 0 v ^)"
            ),
        }
    }
}

impl std::error::Error for PatternError {}

/// Cursor-based matcher for a single gesture pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GestureMatcher {
    pattern: GesturePattern,
    cursor: usize,
}

impl GestureMatcher {
    pub fn new(pattern: GesturePattern) -> Self {
        Self { pattern, cursor: 0 }
    }

    /// Test one trend sample and move the cursor.
    ///
    /// On a mismatch the cursor keeps its position only if the previous
    /// symbol still holds; it never looks further back. Completion is
    /// `cursor == len`, and the cursor is not rewound afterwards: the next
    /// tick has no symbol left to match, so it either stays complete (last
    /// symbol still holds) or resets to 0.
    ///
    /// Returns true when the gesture is complete after this tick.
    pub fn advance(&mut self, sample: TrendSample) -> bool {
        let pattern = &self.pattern;
        let holds = |index: usize| {
            pattern
                .get(index)
                .map(|symbol| sample.holds(symbol))
                .unwrap_or(false)
        };

        if holds(self.cursor) {
            self.cursor += 1;
        } else if self.cursor == 0 || !holds(self.cursor - 1) {
            self.cursor = 0;
        }

        self.is_complete()
    }

    pub fn is_complete(&self) -> bool {
        self.cursor == self.pattern.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn pattern(&self) -> &GesturePattern {
        &self.pattern
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Trend samples satisfying "+vvv000-^^^" symbol by symbol.
    fn gesture_samples() -> Vec<TrendSample> {
        vec![
            TrendSample::new(45, 0),
            TrendSample::new(40, 45),
            TrendSample::new(35, 40),
            TrendSample::new(30, 35),
            TrendSample::new(0, 30),
            TrendSample::new(0, 0),
            TrendSample::new(0, 0),
            TrendSample::new(-118, 0),
            TrendSample::new(-108, -118),
            TrendSample::new(-98, -108),
            TrendSample::new(-83, -98),
        ]
    }

    #[test]
    fn test_pattern_parsing() {
        let pattern: GesturePattern = DEFAULT_GESTURE.parse().unwrap();
        assert_eq!(pattern.len(), 11);
        assert_eq!(pattern.get(0), Some(TrendSymbol::Positive));
        assert_eq!(pattern.get(7), Some(TrendSymbol::Negative));
        assert_eq!(pattern.get(10), Some(TrendSymbol::Rising));
        assert_eq!(pattern.get(11), None);
        assert_eq!(pattern.to_string(), DEFAULT_GESTURE);
        assert_eq!(GesturePattern::default(), pattern);
    }

    #[test]
    fn test_pattern_errors() {
        assert_eq!("".parse::<GesturePattern>(), Err(PatternError::Empty));
        assert_eq!(
            "+vx".parse::<GesturePattern>(),
            Err(PatternError::UnknownSymbol {
                symbol: 'x',
                position: 2
            })
        );
    }

    #[test]
    fn test_pattern_serde() {
        let pattern = GesturePattern::default();
        let json = serde_json::to_string(&pattern).unwrap();
        assert_eq!(json, "\"+vvv000-^^^\"");

        let back: GesturePattern = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pattern);
        assert!(serde_json::from_str::<GesturePattern>("\"+?\"").is_err());
    }

    #[test]
    fn test_full_gesture_completes_once_on_last_symbol() {
        let mut matcher = GestureMatcher::new(GesturePattern::default());
        let samples = gesture_samples();

        let completions: Vec<usize> = samples
            .iter()
            .enumerate()
            .filter_map(|(i, s)| matcher.advance(*s).then_some(i))
            .collect();

        // Every symbol is evaluated, including the final '^'
        assert_eq!(completions, vec![10]);
        assert_eq!(matcher.cursor(), 11);
    }

    #[test]
    fn test_completion_repeats_while_last_symbol_holds() {
        let mut matcher = GestureMatcher::new(GesturePattern::default());
        for sample in gesture_samples() {
            matcher.advance(sample);
        }

        // Still rising: stays complete
        assert!(matcher.advance(TrendSample::new(-68, -83)));
        assert_eq!(matcher.cursor(), 11);

        // Flat: last symbol fails, cursor resets
        assert!(!matcher.advance(TrendSample::new(-68, -68)));
        assert_eq!(matcher.cursor(), 0);
    }

    #[test]
    fn test_mismatch_resets_cursor() {
        let mut matcher = GestureMatcher::new(GesturePattern::default());
        let samples = gesture_samples();
        for sample in &samples[..3] {
            matcher.advance(*sample);
        }
        assert_eq!(matcher.cursor(), 3);

        // Neither 'v' (index 3) nor 'v' (index 2) holds for a rising diff
        assert!(!matcher.advance(TrendSample::new(50, 35)));
        assert_eq!(matcher.cursor(), 0);
    }

    #[test]
    fn test_mismatch_retries_previous_symbol() {
        let mut matcher = GestureMatcher::new(GesturePattern::default());
        let samples = gesture_samples();
        for sample in &samples[..5] {
            matcher.advance(*sample);
        }
        assert_eq!(matcher.cursor(), 5);

        // A nonzero falling diff fails '0' at index 5 and index 4: reset
        let mut reset = matcher.clone();
        reset.advance(TrendSample::new(-1, 0));
        assert_eq!(reset.cursor(), 0);

        // At index 7 ('-'), an extra zero diff still satisfies index 6 ('0')
        matcher.advance(samples[5]);
        matcher.advance(samples[6]);
        assert_eq!(matcher.cursor(), 7);
        for _ in 0..4 {
            assert!(!matcher.advance(TrendSample::new(0, 0)));
            assert_eq!(matcher.cursor(), 7);
        }

        matcher.advance(samples[7]);
        assert_eq!(matcher.cursor(), 8);
    }

    #[test]
    fn test_mismatch_never_rechecks_first_symbol() {
        let mut matcher = GestureMatcher::new(GesturePattern::default());
        matcher.advance(TrendSample::new(45, 0));
        assert_eq!(matcher.cursor(), 1);

        // Fails 'v' at index 1, but '+' at index 0 still holds: kept
        matcher.advance(TrendSample::new(50, 45));
        assert_eq!(matcher.cursor(), 1);

        matcher.advance(TrendSample::new(40, 50));
        assert_eq!(matcher.cursor(), 2);

        // Fails 'v' at indices 2 and 1. It would satisfy '+', but index 0 is
        // not re-tested on the same tick.
        matcher.advance(TrendSample::new(60, 40));
        assert_eq!(matcher.cursor(), 0);
    }

    #[test]
    fn test_failure_at_index_never_advances_past_it() {
        let samples = gesture_samples();
        // Cursor after feeding a (0, 0) sample at each position k.
        // Only '0' holds for it, so positions 4..=6 advance and 7 is kept.
        let expected = [0, 0, 0, 0, 5, 6, 7, 7, 0, 0, 0];

        for k in 1..samples.len() {
            let mut matcher = GestureMatcher::new(GesturePattern::default());
            for sample in &samples[..k] {
                matcher.advance(*sample);
            }
            assert_eq!(matcher.cursor(), k);

            assert!(!matcher.advance(TrendSample::new(0, 0)));
            assert_eq!(matcher.cursor(), expected[k], "failure at index {k}");
        }
    }
}
