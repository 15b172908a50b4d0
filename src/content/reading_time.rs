//! Reading-time estimation

use serde::Serialize;

/// Average adult reading speed used when none is configured
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 200;

/// Estimated time to read a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReadingTime {
    pub words: usize,
    pub minutes: f64,
}

impl ReadingTime {
    /// Estimate from the whitespace-delimited word count of `text`.
    /// A zero `words_per_minute` falls back to [`DEFAULT_WORDS_PER_MINUTE`].
    pub fn estimate(text: &str, words_per_minute: u32) -> Self {
        let wpm = if words_per_minute == 0 {
            DEFAULT_WORDS_PER_MINUTE
        } else {
            words_per_minute
        };
        let words = text.split_whitespace().count();

        Self {
            words,
            minutes: words as f64 / f64::from(wpm),
        }
    }

    /// Human readable label, e.g. "3 min read"
    pub fn text(&self) -> String {
        Self::label(self.minutes)
    }

    /// Label for a minute count
    pub fn label(minutes: f64) -> String {
        // Round to two decimals before ceiling so 1.0000001 reads as 1
        let displayed = ((minutes * 100.0).round() / 100.0).ceil();
        format!("{} min read", displayed as u64)
    }
}
