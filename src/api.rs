//! Transport-independent API layer.
//!
//! `PrivchatApi` is the single entry point for all consumer-facing
//! operations. Transports (MCP, CLI, direct embedding) call `PrivchatApi`
//! methods — they never reach into the recognizer or generation clients
//! directly.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::generation::{GenerationClient, GenerationError};
use crate::mask::{restore, sanitize, Entity, MaskError, PlaceholderMap};
use crate::recognizer::{Recognizer, RecognizerError};

/// Full audit record of one processed prompt — every stage's output, so a
/// caller can inspect exactly what left the process and what came back.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessReport {
    pub original_prompt: String,
    pub detected_entities: Vec<Entity>,
    pub sanitized_prompt: String,
    pub raw_response: String,
    pub restored_response: String,
}

/// Output of the sanitize-only preview (no generation call).
#[derive(Debug, Clone, Serialize)]
pub struct SanitizeReport {
    pub original_prompt: String,
    pub detected_entities: Vec<Entity>,
    pub sanitized_prompt: String,
    pub mapping: PlaceholderMap,
}

/// Single entry point for all consumer-facing operations.
#[derive(Clone)]
pub struct PrivchatApi {
    recognizer: Arc<dyn Recognizer>,
    generation: Arc<dyn GenerationClient>,
}

impl PrivchatApi {
    /// Create a new API instance.
    pub fn new(recognizer: Arc<dyn Recognizer>, generation: Arc<dyn GenerationClient>) -> Self {
        Self {
            recognizer,
            generation,
        }
    }

    /// The composed pipeline: recognize -> sanitize -> generate -> restore.
    ///
    /// Span validation happens before the generation backend is contacted,
    /// so invalid recognizer output never leaks sanitized-but-unvalidated
    /// text downstream. A failure at any stage returns no partial results.
    pub async fn process(&self, prompt: &str) -> Result<ProcessReport, ProcessError> {
        info!(chars = prompt.chars().count(), "processing prompt");

        let entities = self
            .recognizer
            .recognize(prompt)
            .await
            .map_err(ProcessError::Recognizer)?;
        info!(entities = entities.len(), "detected entities");

        let result = sanitize(prompt, &entities).map_err(ProcessError::Mask)?;
        info!(sanitized = %result.sanitized_text, "sanitized prompt");

        let raw_response = self
            .generation
            .generate(&result.sanitized_text)
            .await
            .map_err(ProcessError::Generation)?;
        let restored_response = restore(&raw_response, &result.mapping);
        info!(chars = restored_response.chars().count(), "restored response");

        Ok(ProcessReport {
            original_prompt: prompt.to_string(),
            detected_entities: entities,
            sanitized_prompt: result.sanitized_text,
            raw_response,
            restored_response,
        })
    }

    /// Recognize and sanitize only — previews what would leave the process
    /// without contacting the generation backend.
    pub async fn sanitize_preview(&self, prompt: &str) -> Result<SanitizeReport, ProcessError> {
        let entities = self
            .recognizer
            .recognize(prompt)
            .await
            .map_err(ProcessError::Recognizer)?;
        let result = sanitize(prompt, &entities).map_err(ProcessError::Mask)?;

        Ok(SanitizeReport {
            original_prompt: prompt.to_string(),
            detected_entities: entities,
            sanitized_prompt: result.sanitized_text,
            mapping: result.mapping,
        })
    }
}

/// Error from the `process` workflow.
///
/// The three failure families stay distinct so operators can tell a broken
/// PII engine from a down LLM backend.
#[derive(Debug)]
pub enum ProcessError {
    /// The recognizer oracle failed.
    Recognizer(RecognizerError),
    /// Span validation or placeholder construction failed.
    Mask(MaskError),
    /// The generation backend failed or is unreachable.
    Generation(GenerationError),
}

impl std::fmt::Display for ProcessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Recognizer(e) => write!(f, "recognizer error: {}", e),
            Self::Mask(e) => write!(f, "sanitizer error: {}", e),
            Self::Generation(e) => write!(f, "generation error: {}", e),
        }
    }
}

impl std::error::Error for ProcessError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::MockGeneration;
    use crate::recognizer::MockRecognizer;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const PROMPT: &str =
        "John Doe from Acme Inc. is visiting his colleague, Jane Smith, in Berlin next week.";

    fn visit_entities() -> Vec<Entity> {
        vec![
            Entity::new("John Doe", "PERSON", 0, 8),
            Entity::new("Acme Inc", "ORG", 14, 22),
            Entity::new("Jane Smith", "PERSON", 51, 61),
            Entity::new("Berlin", "GPE", 66, 72),
        ]
    }

    fn setup(generation: MockGeneration) -> PrivchatApi {
        let recognizer = MockRecognizer::available().with_entities(PROMPT, visit_entities());
        PrivchatApi::new(Arc::new(recognizer), Arc::new(generation))
    }

    /// Test backend that counts how often it is contacted.
    struct CountingGeneration {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl GenerationClient for CountingGeneration {
        async fn is_available(&self) -> bool {
            true
        }

        async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(prompt.to_string())
        }
    }

    // === Scenario: process returns every stage's output ===
    #[tokio::test]
    async fn process_returns_all_stages() {
        let api = setup(
            MockGeneration::available()
                .with_reply("Hi [PERSON_1], say hello to [PERSON_2] in [GPE_1]."),
        );

        let report = api.process(PROMPT).await.unwrap();

        assert_eq!(report.original_prompt, PROMPT);
        assert_eq!(report.detected_entities.len(), 4);
        assert_eq!(
            report.sanitized_prompt,
            "[PERSON_1] from [ORG_1]. is visiting his colleague, [PERSON_2], in [GPE_1] next week."
        );
        assert_eq!(
            report.raw_response,
            "Hi [PERSON_1], say hello to [PERSON_2] in [GPE_1]."
        );
        assert_eq!(
            report.restored_response,
            "Hi John Doe, say hello to Jane Smith in Berlin."
        );
    }

    // === Scenario: an echoing backend round-trips the original prompt ===
    #[tokio::test]
    async fn process_round_trips_with_echo_backend() {
        let api = setup(MockGeneration::available());
        let report = api.process(PROMPT).await.unwrap();
        assert_eq!(report.restored_response, PROMPT);
    }

    // === Scenario: a prompt with no PII passes through untouched ===
    #[tokio::test]
    async fn clean_prompt_passes_through() {
        let api = PrivchatApi::new(
            Arc::new(MockRecognizer::available()),
            Arc::new(MockGeneration::available()),
        );

        let report = api.process("nothing sensitive here").await.unwrap();
        assert!(report.detected_entities.is_empty());
        assert_eq!(report.sanitized_prompt, "nothing sensitive here");
        assert_eq!(report.restored_response, "nothing sensitive here");
    }

    // === Scenario: failure families stay distinct ===
    #[tokio::test]
    async fn recognizer_failure_is_distinct() {
        let api = PrivchatApi::new(
            Arc::new(MockRecognizer::unavailable()),
            Arc::new(MockGeneration::available()),
        );

        let err = api.process(PROMPT).await.unwrap_err();
        assert!(matches!(err, ProcessError::Recognizer(_)));
    }

    #[tokio::test]
    async fn generation_failure_is_distinct() {
        let api = setup(MockGeneration::unavailable());
        let err = api.process(PROMPT).await.unwrap_err();
        assert!(matches!(err, ProcessError::Generation(_)));
    }

    // === Scenario: validation fails before the backend is contacted ===
    #[tokio::test]
    async fn overlap_fails_before_generation() {
        let recognizer = MockRecognizer::available().with_entities(
            "hello world",
            vec![
                Entity::new("hello", "X", 0, 5),
                Entity::new("lo wo", "Y", 3, 8),
            ],
        );
        let calls = Arc::new(AtomicUsize::new(0));
        let api = PrivchatApi::new(
            Arc::new(recognizer),
            Arc::new(CountingGeneration {
                calls: calls.clone(),
            }),
        );

        let err = api.process("hello world").await.unwrap_err();
        assert!(matches!(
            err,
            ProcessError::Mask(MaskError::OverlappingEntities { .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    // === Scenario: the preview never contacts the backend ===
    #[tokio::test]
    async fn sanitize_preview_skips_generation() {
        let recognizer = MockRecognizer::available().with_entities(PROMPT, visit_entities());
        let calls = Arc::new(AtomicUsize::new(0));
        let api = PrivchatApi::new(
            Arc::new(recognizer),
            Arc::new(CountingGeneration {
                calls: calls.clone(),
            }),
        );

        let report = api.sanitize_preview(PROMPT).await.unwrap();
        assert_eq!(report.mapping.len(), 4);
        assert_eq!(report.mapping.get("[GPE_1]"), Some("Berlin"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    // === Scenario: the report serializes with its audit field names ===
    #[tokio::test]
    async fn report_serializes_all_five_fields() {
        let api = setup(MockGeneration::available());
        let report = api.process(PROMPT).await.unwrap();

        let json = serde_json::to_value(&report).unwrap();
        for field in [
            "original_prompt",
            "detected_entities",
            "sanitized_prompt",
            "raw_response",
            "restored_response",
        ] {
            assert!(json.get(field).is_some(), "missing field: {}", field);
        }
    }
}
