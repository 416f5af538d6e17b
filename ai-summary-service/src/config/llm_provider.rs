/// Represents the provider (backend) used for summarization.
///
/// This enum distinguishes between the hosted Gemini API and a local Ollama
/// runtime. Adding more providers in the future (e.g., OpenAI, Anthropic)
/// can be done by extending this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Google Gemini generative language API.
    Gemini,
    /// Local Ollama runtime for on-device inference.
    Ollama,
}

impl LlmProvider {
    /// Parses a provider kind string (as found in `LLM_KIND`).
    pub fn parse(kind: &str) -> Option<LlmProvider> {
        match kind.trim().to_ascii_lowercase().as_str() {
            "gemini" => Some(LlmProvider::Gemini),
            "ollama" => Some(LlmProvider::Ollama),
            _ => None,
        }
    }
}
