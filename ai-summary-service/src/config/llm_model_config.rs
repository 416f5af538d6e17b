use crate::config::llm_provider::LlmProvider;

/// Configuration for one LLM model invocation.
///
/// Contains both general and provider-specific parameters; extend as needed
/// to support new backends.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// The LLM provider/backend (Gemini or Ollama).
    pub provider: LlmProvider,

    /// Model identifier string (e.g., `"gemini-2.5-flash"`, `"llama3"`).
    pub model: String,

    /// Inference endpoint (hosted API base URL or local server URL).
    pub endpoint: String,

    /// Optional API key for authentication (required by Gemini).
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature (0.0 = deterministic).
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// Returns a copy of this config with a different model identifier.
    ///
    /// Used when the caller requests a specific model at invocation time
    /// while keeping the endpoint, key, and limits of the base profile.
    pub fn with_model(&self, model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..self.clone()
        }
    }
}
