//! Entity spans produced by the external recognizer

use serde::{Deserialize, Serialize};

/// A labeled character span in a source string, naming a PII occurrence.
///
/// `start`/`end` form a half-open range `[start, end)` of character offsets
/// (Unicode scalar values) into the source string the recognizer was given.
/// The label is an open-vocabulary category tag (e.g. "PERSON", "GPE").
/// The recognizer guarantees neither sort order nor absence of overlaps;
/// the sanitizer handles both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// The covered text as reported by the recognizer
    pub text: String,
    /// Category tag
    pub label: String,
    /// Start offset in characters, inclusive
    pub start: usize,
    /// End offset in characters, exclusive
    pub end: usize,
}

impl Entity {
    /// Create a new entity span.
    pub fn new(
        text: impl Into<String>,
        label: impl Into<String>,
        start: usize,
        end: usize,
    ) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
            start,
            end,
        }
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}) {}", self.start, self.end, self.label)
    }
}
