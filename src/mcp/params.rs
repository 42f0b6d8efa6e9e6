//! MCP tool parameter structs with schemars-derived JSON schemas.

use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ProcessPromptParams {
    #[schemars(description = "The prompt text to sanitize, forward, and restore")]
    pub prompt: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SanitizePromptParams {
    #[schemars(description = "The prompt text to sanitize (no generation call is made)")]
    pub prompt: String,
}
