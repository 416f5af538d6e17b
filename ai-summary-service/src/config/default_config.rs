//! Default summarizer configs loaded strictly from environment variables.
//!
//! Convenience constructors for [`LlmModelConfig`], grouped by provider and
//! role:
//!
//! - **Gemini primary**  → fast default model (`gemini-2.5-flash`)
//! - **Gemini fallback** → more capable model tried second (`gemini-2.5-pro`)
//! - **Ollama**          → local model for offline use
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND`         = provider kind (`gemini` [default], `ollama`)
//! - `LLM_MAX_TOKENS`   = optional max output tokens (u32)
//! - `LLM_TIMEOUT_SECS` = optional request timeout (u64)
//!
//! Gemini-specific:
//! - `GEMINI_API_KEY`        = API key (mandatory)
//! - `GEMINI_ENDPOINT`       = API base URL (optional)
//! - `GEMINI_MODEL`          = primary model (optional)
//! - `GEMINI_MODEL_FALLBACK` = fallback model (optional)
//!
//! Ollama-specific:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (mandatory)
//! - `OLLAMA_MODEL`                = model (mandatory)

use crate::config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
use crate::error_handler::{
    AiSummaryError, ConfigError, Result, env_opt, env_opt_u32, env_opt_u64, must_env,
    validate_http_endpoint,
};
use crate::service_profiles::SummaryServiceProfiles;

/// Default Gemini API base URL.
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Default primary/fallback Gemini models.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_MODEL_FALLBACK: &str = "gemini-2.5-pro";

/// Resolves the Gemini endpoint from env, defaulting to the hosted API.
fn gemini_endpoint() -> Result<String> {
    let endpoint = env_opt("GEMINI_ENDPOINT").unwrap_or_else(|| DEFAULT_GEMINI_ENDPOINT.to_string());
    validate_http_endpoint("GEMINI_ENDPOINT", &endpoint)?;
    Ok(endpoint)
}

/// Resolves the Ollama endpoint strictly from environment.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
///
/// # Errors
/// - [`ConfigError::MissingVar`] if both are missing
/// - [`ConfigError::InvalidNumber`] if `OLLAMA_PORT` is invalid
fn ollama_endpoint() -> Result<String> {
    if let Some(url) = env_opt("OLLAMA_URL") {
        return Ok(url);
    }
    if let Some(port) = env_opt("OLLAMA_PORT") {
        let _ = port
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidNumber {
                var: "OLLAMA_PORT",
                reason: "expected u16 (1..=65535)",
            })?;
        return Ok(format!("http://localhost:{port}"));
    }
    Err(AiSummaryError::Config(ConfigError::MissingVar(
        "OLLAMA_URL or OLLAMA_PORT",
    )))
}

/// Constructs the **primary** Gemini config.
///
/// # Env
/// - `GEMINI_API_KEY` (required), `GEMINI_MODEL` (optional)
///
/// # Defaults
/// - `temperature = Some(0.2)`
/// - `timeout_secs = Some(120)`
pub fn config_gemini_primary() -> Result<LlmModelConfig> {
    let endpoint = gemini_endpoint()?;
    let api_key = must_env("GEMINI_API_KEY")?;
    let model = env_opt("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?;
    let timeout_secs = env_opt_u64("LLM_TIMEOUT_SECS")?.or(Some(120));

    Ok(LlmModelConfig {
        provider: LlmProvider::Gemini,
        model,
        endpoint,
        api_key: Some(api_key),
        max_tokens,
        temperature: Some(0.2),
        top_p: None,
        timeout_secs,
    })
}

/// Constructs the **fallback** Gemini config tried when the primary fails.
///
/// # Env
/// - `GEMINI_API_KEY` (required), `GEMINI_MODEL_FALLBACK` (optional)
///
/// # Defaults
/// - `temperature = Some(0.2)`
/// - `timeout_secs = Some(180)` (the fallback model is slower)
pub fn config_gemini_fallback() -> Result<LlmModelConfig> {
    let mut cfg = config_gemini_primary()?;
    cfg.model =
        env_opt("GEMINI_MODEL_FALLBACK").unwrap_or_else(|| DEFAULT_GEMINI_MODEL_FALLBACK.to_string());
    cfg.timeout_secs = env_opt_u64("LLM_TIMEOUT_SECS")?.or(Some(180));
    Ok(cfg)
}

/// Constructs the local **Ollama** config.
///
/// # Env
/// - `OLLAMA_URL` or `OLLAMA_PORT` (required), `OLLAMA_MODEL` (required)
///
/// # Defaults
/// - `temperature = Some(0.2)`
/// - `timeout_secs = Some(600)` (local generation can be slow)
pub fn config_ollama() -> Result<LlmModelConfig> {
    let endpoint = ollama_endpoint()?;
    let model = must_env("OLLAMA_MODEL")?;
    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?;
    let timeout_secs = env_opt_u64("LLM_TIMEOUT_SECS")?.or(Some(600));

    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model,
        endpoint,
        api_key: None,
        max_tokens,
        temperature: Some(0.2),
        top_p: None,
        timeout_secs,
    })
}

/// Builds [`SummaryServiceProfiles`] from the environment.
///
/// `LLM_KIND` selects the provider (`gemini` when unset). Gemini gets the
/// primary + fallback pair; Ollama runs with a single profile.
///
/// # Errors
/// - [`ConfigError::UnsupportedProvider`] for an unrecognized `LLM_KIND`
/// - the provider-specific config errors listed above
pub fn summarizer_profiles_from_env() -> Result<SummaryServiceProfiles> {
    let kind = env_opt("LLM_KIND").unwrap_or_else(|| "gemini".to_string());
    let provider = LlmProvider::parse(&kind)
        .ok_or_else(|| AiSummaryError::from(ConfigError::UnsupportedProvider(kind)))?;

    match provider {
        LlmProvider::Gemini => SummaryServiceProfiles::new(
            config_gemini_primary()?,
            Some(config_gemini_fallback()?),
            env_opt_u64("LLM_TIMEOUT_SECS")?,
        ),
        LlmProvider::Ollama => {
            SummaryServiceProfiles::new(config_ollama()?, None, env_opt_u64("LLM_TIMEOUT_SECS")?)
        }
    }
}
