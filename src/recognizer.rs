//! Recognizer client — integration with the external named-entity service
//!
//! Defines the client trait and wire types for obtaining entity spans.
//! Two implementations:
//! - `HttpRecognizer`: POSTs text to a NER sidecar service (production)
//! - `MockRecognizer`: returns preconfigured entity lists (testing)
//!
//! The recognizer is consumed as an oracle: given a string it returns
//! labeled character spans. It guarantees neither span ordering nor absence
//! of overlaps — validation is the sanitizer's job.

use crate::mask::Entity;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from recognizer client operations.
#[derive(Debug, Error)]
pub enum RecognizerError {
    #[error("recognizer not available: {0}")]
    Unavailable(String),
    #[error("recognizer request failed: {0}")]
    RequestFailed(String),
    #[error("recognizer response parse error: {0}")]
    InvalidResponse(String),
}

/// Client trait for the external named-entity recognizer.
///
/// Abstracts over transport (HTTP sidecar, mock) so the pipeline doesn't
/// depend on how the recognizer is reached.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Check if the recognizer is reachable.
    async fn is_available(&self) -> bool;

    /// Detect entity spans in `text`.
    async fn recognize(&self, text: &str) -> Result<Vec<Entity>, RecognizerError>;
}

#[derive(Serialize)]
struct RecognizeRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct RecognizeResponse {
    entities: Vec<Entity>,
}

/// HTTP client for a NER sidecar service.
///
/// Expects `POST <base_url>/ner` with `{"text": ...}` to answer
/// `{"entities": [{"text", "label", "start", "end"}, ...]}` where offsets
/// count characters of the submitted text.
pub struct HttpRecognizer {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRecognizer {
    /// Create a client for the recognizer service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Recognizer for HttpRecognizer {
    async fn is_available(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self.client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                warn!(status = %resp.status(), "recognizer health check failed");
                false
            }
            Err(e) => {
                warn!(error = %e, "recognizer unreachable");
                false
            }
        }
    }

    async fn recognize(&self, text: &str) -> Result<Vec<Entity>, RecognizerError> {
        let url = format!("{}/ner", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&RecognizeRequest { text })
            .send()
            .await
            .map_err(|e| RecognizerError::Unavailable(format!("recognizer HTTP error: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RecognizerError::RequestFailed(format!(
                "recognizer returned {status}: {body}"
            )));
        }

        let parsed: RecognizeResponse = response
            .json()
            .await
            .map_err(|e| RecognizerError::InvalidResponse(e.to_string()))?;
        debug!(entities = parsed.entities.len(), "recognizer returned spans");
        Ok(parsed.entities)
    }
}

/// Mock recognizer for testing — returns preconfigured entity lists.
pub struct MockRecognizer {
    available: bool,
    responses: HashMap<String, Vec<Entity>>,
}

impl MockRecognizer {
    /// Create a mock recognizer that reports as available.
    pub fn available() -> Self {
        Self {
            available: true,
            responses: HashMap::new(),
        }
    }

    /// Create a mock recognizer that reports as unavailable.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            responses: HashMap::new(),
        }
    }

    /// Register the entities to return for a specific input text.
    ///
    /// Unregistered texts return an empty entity list (no PII found).
    pub fn with_entities(mut self, text: impl Into<String>, entities: Vec<Entity>) -> Self {
        self.responses.insert(text.into(), entities);
        self
    }
}

#[async_trait]
impl Recognizer for MockRecognizer {
    async fn is_available(&self) -> bool {
        self.available
    }

    async fn recognize(&self, text: &str) -> Result<Vec<Entity>, RecognizerError> {
        if !self.available {
            return Err(RecognizerError::Unavailable(
                "mock recognizer configured as unavailable".to_string(),
            ));
        }
        Ok(self.responses.get(text).cloned().unwrap_or_default())
    }
}
