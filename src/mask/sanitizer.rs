//! Sanitizer: rewrites entity spans into reversible indexed placeholders

use super::entity::Entity;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use thiserror::Error;

/// Errors from span validation and placeholder construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MaskError {
    #[error("invalid span [{start}, {end}) for source of {len} characters")]
    InvalidSpan {
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("overlapping entities: {first} and {second}")]
    OverlappingEntities { first: Entity, second: Entity },

    #[error("placeholder collision: {0}")]
    PlaceholderCollision(String),
}

/// Result type for mask operations
pub type MaskResult<T> = Result<T, MaskError>;

/// Record of placeholder -> original substitutions for one sanitize call.
///
/// Preserves insertion order (ascending original start offset) for display
/// and serialization; lookup is by key. Scoped to the sanitize call that
/// built it — applying it to text derived from a different source is the
/// caller's contract violation to avoid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderMap {
    entries: Vec<(String, String)>,
}

impl PlaceholderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a placeholder -> original pair.
    ///
    /// Per-label numbering is monotonic, so a duplicate token is an internal
    /// invariant violation; it fails rather than overwriting.
    pub(crate) fn insert(&mut self, placeholder: String, original: String) -> MaskResult<()> {
        if self.entries.iter().any(|(p, _)| p == &placeholder) {
            return Err(MaskError::PlaceholderCollision(placeholder));
        }
        self.entries.push((placeholder, original));
        Ok(())
    }

    /// Look up the original text for a placeholder token.
    pub fn get(&self, placeholder: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| p == placeholder)
            .map(|(_, original)| original.as_str())
    }

    /// Iterate pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(p, original)| (p.as_str(), original.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for PlaceholderMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (placeholder, original) in &self.entries {
            map.serialize_entry(placeholder, original)?;
        }
        map.end()
    }
}

/// Output of one sanitize call.
///
/// Both fields are logically paired: the mapping is only meaningful against
/// this `sanitized_text` and text derived from it.
#[derive(Debug, Clone, Serialize)]
pub struct SanitizeResult {
    pub sanitized_text: String,
    pub mapping: PlaceholderMap,
}

/// Replace every entity span in `source` with an indexed `[LABEL_N]`
/// placeholder and record the reverse mapping.
///
/// Entities may arrive in any order; they are renumbered by ascending start
/// offset (ties keep input order) so the output is deterministic regardless
/// of recognizer iteration order. Every span must be in bounds and the spans
/// must not overlap — a violation fails the whole call before any text is
/// produced, so no partially sanitized artifact ever escapes.
///
/// The mapping value for each entity is the actual covered slice of
/// `source`; the recognizer's `text` claim is not consulted.
pub fn sanitize(source: &str, entities: &[Entity]) -> MaskResult<SanitizeResult> {
    // Char-offset -> byte-offset table; index char_len maps to source.len().
    let boundaries: Vec<usize> = source
        .char_indices()
        .map(|(byte, _)| byte)
        .chain([source.len()])
        .collect();
    let char_len = boundaries.len() - 1;

    for entity in entities {
        if entity.start >= entity.end || entity.end > char_len {
            return Err(MaskError::InvalidSpan {
                start: entity.start,
                end: entity.end,
                len: char_len,
            });
        }
    }

    let mut ordered: Vec<&Entity> = entities.iter().collect();
    ordered.sort_by_key(|e| e.start);

    for pair in ordered.windows(2) {
        if pair[1].start < pair[0].end {
            return Err(MaskError::OverlappingEntities {
                first: pair[0].clone(),
                second: pair[1].clone(),
            });
        }
    }

    let mut counters: HashMap<&str, usize> = HashMap::new();
    let mut mapping = PlaceholderMap::new();
    let mut sanitized = String::with_capacity(source.len());
    let mut cursor = 0usize;

    for entity in &ordered {
        let (from, to) = (boundaries[entity.start], boundaries[entity.end]);
        let count = counters.entry(entity.label.as_str()).or_insert(0);
        *count += 1;
        let placeholder = format!("[{}_{}]", entity.label, count);
        mapping.insert(placeholder.clone(), source[from..to].to_string())?;
        sanitized.push_str(&source[cursor..from]);
        sanitized.push_str(&placeholder);
        cursor = to;
    }
    sanitized.push_str(&source[cursor..]);

    Ok(SanitizeResult {
        sanitized_text: sanitized,
        mapping,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbering_is_per_label_and_one_based() {
        let source = "Ann met Bob in Paris";
        let entities = vec![
            Entity::new("Ann", "PERSON", 0, 3),
            Entity::new("Bob", "PERSON", 8, 11),
            Entity::new("Paris", "GPE", 15, 20),
        ];
        let result = sanitize(source, &entities).unwrap();
        assert_eq!(result.sanitized_text, "[PERSON_1] met [PERSON_2] in [GPE_1]");
        assert_eq!(result.mapping.get("[PERSON_1]"), Some("Ann"));
        assert_eq!(result.mapping.get("[PERSON_2]"), Some("Bob"));
        assert_eq!(result.mapping.get("[GPE_1]"), Some("Paris"));
    }

    #[test]
    fn mapping_records_the_source_slice_not_the_claim() {
        // Recognizer text disagrees with the span; the slice wins.
        let entities = vec![Entity::new("stale", "PERSON", 0, 3)];
        let result = sanitize("Ann met Bob", &entities).unwrap();
        assert_eq!(result.mapping.get("[PERSON_1]"), Some("Ann"));
    }

    #[test]
    fn empty_span_is_invalid() {
        let entities = vec![Entity::new("", "X", 3, 3)];
        let err = sanitize("hello", &entities).unwrap_err();
        assert_eq!(
            err,
            MaskError::InvalidSpan {
                start: 3,
                end: 3,
                len: 5
            }
        );
    }

    #[test]
    fn inverted_span_is_invalid() {
        let entities = vec![Entity::new("x", "X", 4, 2)];
        assert!(matches!(
            sanitize("hello", &entities),
            Err(MaskError::InvalidSpan { .. })
        ));
    }

    #[test]
    fn out_of_bounds_span_is_invalid() {
        let entities = vec![Entity::new("x", "X", 2, 9)];
        let err = sanitize("hello", &entities).unwrap_err();
        assert_eq!(
            err,
            MaskError::InvalidSpan {
                start: 2,
                end: 9,
                len: 5
            }
        );
    }

    #[test]
    fn one_invalid_span_fails_the_whole_call() {
        let entities = vec![
            Entity::new("hel", "X", 0, 3),
            Entity::new("bad", "Y", 4, 99),
        ];
        assert!(matches!(
            sanitize("hello", &entities),
            Err(MaskError::InvalidSpan { .. })
        ));
    }

    #[test]
    fn placeholder_map_rejects_duplicate_token() {
        let mut map = PlaceholderMap::new();
        map.insert("[PERSON_1]".into(), "Ann".into()).unwrap();
        let err = map.insert("[PERSON_1]".into(), "Bob".into()).unwrap_err();
        assert_eq!(err, MaskError::PlaceholderCollision("[PERSON_1]".into()));
        // The first entry survives untouched.
        assert_eq!(map.get("[PERSON_1]"), Some("Ann"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn placeholder_map_serializes_in_insertion_order() {
        let mut map = PlaceholderMap::new();
        map.insert("[PERSON_1]".into(), "Ann".into()).unwrap();
        map.insert("[GPE_1]".into(), "Paris".into()).unwrap();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"[PERSON_1]":"Ann","[GPE_1]":"Paris"}"#);
    }
}
