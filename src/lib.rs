//! Privchat: PII-Sanitizing Proxy Engine
//!
//! Accepts free-form text containing personally identifiable information,
//! replaces recognized entity spans with reversible indexed placeholders,
//! forwards the sanitized text to a text-generation backend, and restores
//! the original values wherever the backend echoes a placeholder.
//!
//! # Core Concepts
//!
//! - **Entities**: labeled character spans produced by an external recognizer
//! - **Placeholders**: `[LABEL_N]` tokens substituted for entity spans
//! - **Restoration**: reverse substitution of placeholders in downstream text
//!
//! # Example
//!
//! ```
//! use privchat::{restore, sanitize, Entity};
//!
//! let entities = vec![Entity::new("Ann", "PERSON", 0, 3)];
//! let result = sanitize("Ann lives here.", &entities).unwrap();
//! assert_eq!(result.sanitized_text, "[PERSON_1] lives here.");
//! assert_eq!(restore("Hi [PERSON_1]!", &result.mapping), "Hi Ann!");
//! ```

mod mask;

pub mod api;
pub mod config;
pub mod generation;
pub mod mcp;
pub mod recognizer;

pub use api::{PrivchatApi, ProcessError, ProcessReport, SanitizeReport};
pub use config::Settings;
pub use generation::{GenerationClient, GenerationError, MockGeneration, OllamaClient};
pub use mask::{restore, sanitize, Entity, MaskError, MaskResult, PlaceholderMap, SanitizeResult};
pub use recognizer::{HttpRecognizer, MockRecognizer, Recognizer, RecognizerError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
