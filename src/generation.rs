//! Generation client — integration with the text-generation backend
//!
//! Defines the client trait for sending a sanitized prompt to an LLM and
//! receiving its response. Two implementations:
//! - `OllamaClient`: non-streaming chat against a local Ollama instance (production)
//! - `MockGeneration`: returns a preconfigured reply (testing)
//!
//! The backend is consumed as an oracle: prompt string in, response string
//! out, or a failure signal. Retries, scheduling, and model management are
//! the backend's concern.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from generation client operations.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation backend not available: {0}")]
    Unavailable(String),
    #[error("generation response parse error: {0}")]
    InvalidResponse(String),
}

/// Client trait for the text-generation backend.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Check if the backend is reachable.
    async fn is_available(&self) -> bool;

    /// Generate a response for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Non-streaming chat client for a local Ollama instance.
pub struct OllamaClient {
    base_url: String,
    model: String,
    instruction: Option<String>,
    client: reqwest::Client,
}

impl OllamaClient {
    /// Create a client for the Ollama instance at `base_url`
    /// (conventionally `http://localhost:11434`).
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            instruction: None,
            client: reqwest::Client::new(),
        }
    }

    /// Prefix every prompt with an instruction line (e.g. a paraphrase
    /// request). An empty instruction disables the prefix.
    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        let instruction = instruction.into();
        if !instruction.is_empty() {
            self.instruction = Some(instruction);
        }
        self
    }

    fn compose(&self, prompt: &str) -> String {
        match &self.instruction {
            Some(instruction) => format!("{} {}", instruction, prompt),
            None => prompt.to_string(),
        }
    }
}

#[async_trait]
impl GenerationClient for OllamaClient {
    async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match self.client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => {
                debug!(model = %self.model, "ollama health check passed");
                true
            }
            Ok(resp) => {
                warn!(status = %resp.status(), "ollama health check failed");
                false
            }
            Err(e) => {
                warn!(error = %e, "ollama unreachable");
                false
            }
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!("{}/api/chat", self.base_url);
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: self.compose(prompt),
            }],
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Unavailable(format!("ollama HTTP error: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Unavailable(format!(
                "ollama returned {status}: {body}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;
        debug!(chars = parsed.message.content.len(), "ollama returned response");
        Ok(parsed.message.content)
    }
}

/// Mock generation client for testing — returns a preconfigured reply,
/// or echoes the prompt when no reply is registered.
pub struct MockGeneration {
    available: bool,
    reply: Option<String>,
}

impl MockGeneration {
    /// Create a mock backend that reports as available.
    pub fn available() -> Self {
        Self {
            available: true,
            reply: None,
        }
    }

    /// Create a mock backend that reports as unavailable.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            reply: None,
        }
    }

    /// Register the reply to return for any prompt.
    pub fn with_reply(mut self, reply: impl Into<String>) -> Self {
        self.reply = Some(reply.into());
        self
    }
}

#[async_trait]
impl GenerationClient for MockGeneration {
    async fn is_available(&self) -> bool {
        self.available
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        if !self.available {
            return Err(GenerationError::Unavailable(
                "mock generation configured as unavailable".to_string(),
            ));
        }
        Ok(self
            .reply
            .clone()
            .unwrap_or_else(|| prompt.to_string()))
    }
}
