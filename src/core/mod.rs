//! Core gesture detection.
//!
//! This module contains:
//! - The trend filter turning raw readings into trend samples
//! - The gesture matcher walking a pattern of trend symbols
//! - The repeat counter deciding when a repeated gesture locks the screen
//! - The detector tying the three together with the post-lock cooldown

pub mod detector;
pub mod gesture;
pub mod repeat;
pub mod trend;

// Re-export commonly used types
pub use detector::{Detector, TickOutcome};
pub use gesture::{GestureMatcher, GesturePattern, PatternError, DEFAULT_GESTURE};
pub use repeat::{AnchorPolicy, RepeatCounter, RepeatTiming};
pub use trend::{TrendFilter, TrendSample, TrendSymbol};
