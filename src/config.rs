//! Environment-driven settings

/// Application configuration read from environment variables, with defaults
/// suited to a local development setup.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Base URL of the NER sidecar service
    pub recognizer_url: String,
    /// Base URL of the Ollama instance
    pub ollama_url: String,
    /// Ollama model name
    pub ollama_model: String,
    /// Instruction line prefixed to every sanitized prompt; empty disables it
    pub prompt_instruction: String,
}

impl Settings {
    /// Read settings from `RECOGNIZER_URL`, `OLLAMA_URL`, `OLLAMA_MODEL`,
    /// and `PROMPT_INSTRUCTION`, falling back to defaults.
    pub fn from_env() -> Self {
        let recognizer_url = std::env::var("RECOGNIZER_URL")
            .unwrap_or_else(|_| "http://localhost:8500".to_string());
        let ollama_url =
            std::env::var("OLLAMA_URL").unwrap_or_else(|_| "http://localhost:11434".to_string());
        let ollama_model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3".to_string());
        let prompt_instruction = std::env::var("PROMPT_INSTRUCTION")
            .unwrap_or_else(|_| "Politely and concisely paraphrase this:".to_string());

        Self {
            recognizer_url,
            ollama_url,
            ollama_model,
            prompt_instruction,
        }
    }
}
