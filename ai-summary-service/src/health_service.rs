//! Universal health service for summarizer backends (Gemini, Ollama).
//!
//! Lightweight connectivity probes per provider:
//! - Gemini: `GET {endpoint}/v1beta/models` with the API key header
//! - Ollama: `GET {endpoint}/api/tags`
//!
//! The returned [`HealthStatus`] is JSON-serializable and suitable for a
//! startup self-check or a `/health` endpoint. [`HealthService::check`] is
//! resilient and never fails (errors mapped to `ok=false`); the
//! provider-specific `try_*` probes return strict `Result`.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{HealthError, make_snippet};

/// A serializable health snapshot for a single provider/config.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Backend/provider (e.g., "Gemini", "Ollama").
    pub provider: String,
    /// Target endpoint base URL.
    pub endpoint: String,
    /// Model identifier relevant to the probe (if any).
    pub model: Option<String>,
    /// Overall health flag.
    pub ok: bool,
    /// Measured HTTP latency in milliseconds for the probe.
    pub latency_ms: u128,
    /// Short human-readable message with details.
    pub message: String,
}

impl HealthStatus {
    #[inline]
    fn ok(cfg: &LlmModelConfig, latency_ms: u128, message: impl Into<String>) -> Self {
        Self {
            provider: format!("{:?}", cfg.provider),
            endpoint: cfg.endpoint.clone(),
            model: Some(cfg.model.clone()),
            ok: true,
            latency_ms,
            message: message.into(),
        }
    }

    #[inline]
    fn fail(cfg: &LlmModelConfig, latency_ms: u128, message: impl Into<String>) -> Self {
        Self {
            provider: format!("{:?}", cfg.provider),
            endpoint: cfg.endpoint.clone(),
            model: Some(cfg.model.clone()),
            ok: false,
            latency_ms,
            message: message.into(),
        }
    }
}

/// A universal health checker that reuses a single HTTP client.
pub struct HealthService {
    client: reqwest::Client,
}

impl HealthService {
    /// Creates a checker with the given probe timeout (default 10s).
    ///
    /// # Errors
    /// Propagates `reqwest` client construction failures.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Probes one config; never fails.
    pub async fn check(&self, cfg: &LlmModelConfig) -> HealthStatus {
        let started = Instant::now();
        let result = match cfg.provider {
            LlmProvider::Gemini => self.try_gemini(cfg).await,
            LlmProvider::Ollama => self.try_ollama(cfg).await,
        };
        let latency_ms = started.elapsed().as_millis();

        match result {
            Ok(message) => {
                debug!(provider = ?cfg.provider, latency_ms, "health probe ok");
                HealthStatus::ok(cfg, latency_ms, message)
            }
            Err(err) => {
                warn!(provider = ?cfg.provider, error = %err, "health probe failed");
                HealthStatus::fail(cfg, latency_ms, err.to_string())
            }
        }
    }

    /// Probes several configs sequentially.
    pub async fn check_many(&self, cfgs: &[LlmModelConfig]) -> Vec<HealthStatus> {
        let mut out = Vec::with_capacity(cfgs.len());
        for cfg in cfgs {
            out.push(self.check(cfg).await);
        }
        out
    }

    /// Strict Gemini probe: lists models with the configured API key.
    async fn try_gemini(&self, cfg: &LlmModelConfig) -> Result<String, HealthError> {
        let base = valid_base(cfg)?;
        let url = format!("{base}/v1beta/models");
        let key = cfg.api_key.clone().unwrap_or_default();

        let resp = self
            .client
            .get(&url)
            .header("x-goog-api-key", key)
            .send()
            .await
            .map_err(|e| HealthError::Decode(format!("transport: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(HealthError::HttpStatus {
                status,
                url,
                snippet: make_snippet(&body),
            });
        }
        Ok("Gemini API reachable and key accepted".to_string())
    }

    /// Strict Ollama probe: lists local tags.
    async fn try_ollama(&self, cfg: &LlmModelConfig) -> Result<String, HealthError> {
        let base = valid_base(cfg)?;
        let url = format!("{base}/api/tags");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| HealthError::Decode(format!("transport: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(HealthError::HttpStatus {
                status,
                url,
                snippet: make_snippet(&body),
            });
        }
        Ok("Ollama server reachable".to_string())
    }
}

fn valid_base(cfg: &LlmModelConfig) -> Result<String, HealthError> {
    let endpoint = cfg.endpoint.trim();
    if endpoint.is_empty()
        || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
    {
        return Err(HealthError::InvalidEndpoint(cfg.endpoint.clone()));
    }
    Ok(endpoint.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_endpoint_is_rejected_before_any_request() {
        let cfg = LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: "llama3".into(),
            endpoint: "localhost:11434".into(),
            api_key: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: None,
        };
        assert!(matches!(
            valid_base(&cfg),
            Err(HealthError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn base_url_is_normalized() {
        let cfg = LlmModelConfig {
            provider: LlmProvider::Gemini,
            model: "gemini-2.5-flash".into(),
            endpoint: "https://generativelanguage.googleapis.com/".into(),
            api_key: Some("k".into()),
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: None,
        };
        assert_eq!(
            valid_base(&cfg).expect("valid"),
            "https://generativelanguage.googleapis.com"
        );
    }
}
