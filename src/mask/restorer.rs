//! Restorer: substitutes original values back into downstream text

use super::sanitizer::PlaceholderMap;

/// Replace every literal occurrence of each mapped placeholder in `text`
/// with its original value.
///
/// Every token is bracket-delimited and distinct per label+number pair, so
/// no token is a strict substring of another and replacement order across
/// entries does not matter. Multiple echoes of one placeholder all restore
/// to the same value; mapped tokens absent from `text` are no-ops; tokens
/// that merely resemble placeholder syntax but are not mapped pass through
/// verbatim — the restorer never guesses.
pub fn restore(text: &str, mapping: &PlaceholderMap) -> String {
    mapping
        .iter()
        .fold(text.to_string(), |acc, (placeholder, original)| {
            acc.replace(placeholder, original)
        })
}
