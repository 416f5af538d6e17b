//! Lightweight Gemini client for text generation.
//!
//! This module implements a thin client for the Google generative language
//! API:
//! - `POST {endpoint}/v1beta/models/{model}:generateContent`
//!
//! Authentication is the `x-goog-api-key` header. Requests are synchronous
//! (non-streaming) with a bounded timeout taken from the config. The client
//! validates at construction that the selected provider is
//! [`LlmProvider::Gemini`], the endpoint is an http(s) URL, and an API key is
//! present.

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::make_snippet;

/// Errors produced by [`GeminiService`].
#[derive(Debug, Error)]
pub enum GeminiError {
    /// The provider in the config is not Gemini.
    #[error("[AI Summary Service] invalid provider: expected Gemini, got different provider")]
    InvalidProvider,

    /// Invalid endpoint (empty or missing http/https).
    #[error("[AI Summary Service] invalid Gemini endpoint: {0}")]
    InvalidEndpoint(String),

    /// No API key in the config.
    #[error("[AI Summary Service] missing Gemini API key")]
    MissingApiKey,

    /// Transport/HTTP client error.
    #[error("[AI Summary Service] transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-successful HTTP status from upstream.
    #[error("[AI Summary Service] unexpected HTTP status {status} from {url}: {snippet}")]
    HttpStatus {
        /// Numeric HTTP status code.
        status: StatusCode,
        /// Request URL.
        url: String,
        /// Short snippet of the response body.
        snippet: String,
    },

    /// Unexpected/invalid JSON response.
    #[error("[AI Summary Service] failed to decode response: {0}")]
    Decode(String),

    /// The response carried no usable candidate text.
    #[error("[AI Summary Service] Gemini returned no candidate text")]
    EmptyCandidates,
}

/// Result alias for Gemini operations.
pub type Result<T> = std::result::Result<T, GeminiError>;

/// Thin client for the Gemini generateContent API.
///
/// Initialized with a full [`LlmModelConfig`]. Reuses an HTTP client with a
/// configurable timeout.
pub struct GeminiService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    api_key: String,
    url_generate: String,
}

impl GeminiService {
    /// Creates a new [`GeminiService`] from the given config.
    ///
    /// # Errors
    /// - [`GeminiError::InvalidProvider`] if `cfg.provider` is not `Gemini`
    /// - [`GeminiError::InvalidEndpoint`] if `cfg.endpoint` is invalid
    /// - [`GeminiError::MissingApiKey`] if `cfg.api_key` is `None`
    /// - [`GeminiError::Transport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self> {
        if cfg.provider != LlmProvider::Gemini {
            return Err(GeminiError::InvalidProvider);
        }

        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(GeminiError::InvalidEndpoint(cfg.endpoint));
        }

        let api_key = match cfg.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => key.trim().to_string(),
            _ => return Err(GeminiError::MissingApiKey),
        };

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(120));

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        let base = endpoint.trim_end_matches('/').to_string();
        let url_generate = format!("{}/v1beta/models/{}:generateContent", base, cfg.model);

        Ok(Self {
            client,
            cfg,
            api_key,
            url_generate,
        })
    }

    /// Performs a **non-streaming** generation request.
    ///
    /// Mapped options:
    /// - `model`             ← `self.cfg.model` (part of the URL)
    /// - `contents`          ← single user part with `prompt`
    /// - `maxOutputTokens`   ← `self.cfg.max_tokens`
    /// - `temperature`       ← `self.cfg.temperature`
    /// - `topP`              ← `self.cfg.top_p`
    ///
    /// # Errors
    /// - [`GeminiError::HttpStatus`] for non-2xx responses
    /// - [`GeminiError::Transport`] for client errors
    /// - [`GeminiError::Decode`] if the response cannot be parsed
    /// - [`GeminiError::EmptyCandidates`] if no candidate text came back
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let body = GenerateContentRequest::from_cfg(&self.cfg, prompt);

        debug!("POST {}", self.url_generate);
        let resp = self
            .client
            .post(&self.url_generate)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_generate.clone();
            let text = resp.text().await.unwrap_or_default();
            return Err(GeminiError::HttpStatus {
                status,
                url,
                snippet: make_snippet(&text),
            });
        }

        let out: GenerateContentResponse = resp
            .json()
            .await
            .map_err(|e| GeminiError::Decode(format!("serde error: {e}")))?;

        let text = out
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(GeminiError::EmptyCandidates);
        }
        Ok(text)
    }
}

/* ==========================
HTTP payloads & options
========================== */

/// Request body for `:generateContent`.
#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl<'a> GenerateContentRequest<'a> {
    /// Builds a request from config and prompt.
    fn from_cfg(cfg: &'a LlmModelConfig, prompt: &'a str) -> Self {
        let generation_config = GenerationConfig {
            max_output_tokens: cfg.max_tokens,
            temperature: cfg.temperature,
            top_p: cfg.top_p,
        };

        Self {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: Some(generation_config),
        }
    }
}

/// One content turn; this client always sends a single user turn.
#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// Subset of Gemini `generationConfig`.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
}

/// Response body for `:generateContent`.
///
/// Minimal shape: text lives in `candidates[0].content.parts[].text`.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gemini_cfg() -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Gemini,
            model: "gemini-2.5-flash".into(),
            endpoint: "https://generativelanguage.googleapis.com".into(),
            api_key: Some("test-key".into()),
            max_tokens: Some(1024),
            temperature: Some(0.2),
            top_p: None,
            timeout_secs: Some(30),
        }
    }

    #[test]
    fn construction_validates_config() {
        assert!(GeminiService::new(gemini_cfg()).is_ok());

        let mut cfg = gemini_cfg();
        cfg.provider = LlmProvider::Ollama;
        assert!(matches!(
            GeminiService::new(cfg),
            Err(GeminiError::InvalidProvider)
        ));

        let mut cfg = gemini_cfg();
        cfg.api_key = None;
        assert!(matches!(
            GeminiService::new(cfg),
            Err(GeminiError::MissingApiKey)
        ));

        let mut cfg = gemini_cfg();
        cfg.endpoint = "generativelanguage.googleapis.com".into();
        assert!(matches!(
            GeminiService::new(cfg),
            Err(GeminiError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn generate_url_embeds_the_model() {
        let svc = GeminiService::new(gemini_cfg()).expect("valid config");
        assert_eq!(
            svc.url_generate,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn request_body_serializes_camel_case() {
        let cfg = gemini_cfg();
        let body = GenerateContentRequest::from_cfg(&cfg, "hello");
        let json = serde_json::to_value(&body).expect("serializable");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 1024);
        assert!(json["generationConfig"].get("topP").is_none());
    }

    #[test]
    fn response_text_is_joined_from_parts() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"a"},{"text":"b"}]}}]}"#;
        let out: GenerateContentResponse = serde_json::from_str(raw).expect("decodable");
        let text: String = out.candidates[0]
            .content
            .as_ref()
            .map(|c| c.parts.iter().filter_map(|p| p.text.clone()).collect())
            .unwrap_or_default();
        assert_eq!(text, "ab");
    }
}
