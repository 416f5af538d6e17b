//! Shared summary service with two profiles: **primary** and **fallback**.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Caches underlying HTTP clients per config (endpoint+model+key+timeout).
//! - `summarize` tries the primary model first and falls back to the second
//!   one; only when every candidate fails does the call return an error
//!   carrying the last failure.
//!
//! The fallback mirrors how the system degrades from a fast default model to
//! a more capable one when the first request fails.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
use crate::error_handler::{AiSummaryError, Result};
use crate::health_service::{HealthService, HealthStatus};
use crate::services::{gemini_service::GeminiService, ollama_service::OllamaService};

/// Shared service managing the **primary** and optional **fallback**
/// summarizer profiles.
///
/// Internally caches Gemini/Ollama clients keyed by their configuration to
/// avoid recreating HTTP clients on each call.
pub struct SummaryServiceProfiles {
    primary: LlmModelConfig,
    fallback: Option<LlmModelConfig>,

    gemini: RwLock<HashMap<ClientKey, Arc<GeminiService>>>,
    ollama: RwLock<HashMap<ClientKey, Arc<OllamaService>>>,

    health: HealthService,
}

impl SummaryServiceProfiles {
    /// Creates a new service.
    ///
    /// - `primary`: required primary profile.
    /// - `fallback`: optional fallback profile tried after the primary fails.
    /// - `health_timeout_secs`: optional timeout for the health checker.
    pub fn new(
        primary: LlmModelConfig,
        fallback: Option<LlmModelConfig>,
        health_timeout_secs: Option<u64>,
    ) -> Result<Self> {
        Ok(Self {
            primary,
            fallback,
            gemini: RwLock::new(HashMap::new()),
            ollama: RwLock::new(HashMap::new()),
            health: HealthService::new(health_timeout_secs)?,
        })
    }

    /// Summarizes `prompt`, trying the primary profile and then the fallback.
    ///
    /// `model_override` swaps the model id on the primary profile while
    /// keeping its endpoint, key, and limits; the fallback is still tried
    /// afterwards when it differs.
    ///
    /// # Errors
    /// [`AiSummaryError::AllModelsFailed`] when every candidate model failed;
    /// the message carries the last underlying error.
    pub async fn summarize(&self, prompt: &str, model_override: Option<&str>) -> Result<String> {
        let mut last_err: Option<AiSummaryError> = None;

        for cfg in self.candidate_configs(model_override) {
            debug!(provider = ?cfg.provider, model = %cfg.model, "summarize attempt");
            match self.generate_with(&cfg, prompt).await {
                Ok(text) if !text.trim().is_empty() => return Ok(text.trim().to_string()),
                Ok(_) => {
                    warn!(model = %cfg.model, "model returned empty text; trying next candidate");
                    last_err = Some(AiSummaryError::AllModelsFailed(format!(
                        "model {} returned empty text",
                        cfg.model
                    )));
                }
                Err(err) => {
                    warn!(model = %cfg.model, error = %err, "model failed; trying next candidate");
                    last_err = Some(err);
                }
            }
        }

        Err(AiSummaryError::AllModelsFailed(
            last_err
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no candidate models configured".to_string()),
        ))
    }

    /// Returns a health snapshot for all distinct profiles.
    pub async fn health_all(&self) -> Vec<HealthStatus> {
        let mut list = Vec::with_capacity(2);
        list.push(self.primary.clone());
        if let Some(fb) = &self.fallback {
            if *fb != self.primary {
                list.push(fb.clone());
            }
        }
        self.health.check_many(&list).await
    }

    /* --------------------- Internals --------------------- */

    /// Ordered candidate configs for one summarize call.
    fn candidate_configs(&self, model_override: Option<&str>) -> Vec<LlmModelConfig> {
        let first = match model_override {
            Some(model) if !model.trim().is_empty() => self.primary.with_model(model.trim()),
            _ => self.primary.clone(),
        };

        let mut candidates = vec![first];
        if let Some(fb) = &self.fallback {
            if !candidates.contains(fb) {
                candidates.push(fb.clone());
            }
        }
        candidates
    }

    async fn generate_with(&self, cfg: &LlmModelConfig, prompt: &str) -> Result<String> {
        match cfg.provider {
            LlmProvider::Gemini => {
                let cli = self.get_or_init_gemini(cfg).await?;
                cli.generate(prompt).await.map_err(AiSummaryError::from)
            }
            LlmProvider::Ollama => {
                let cli = self.get_or_init_ollama(cfg).await?;
                cli.generate(prompt).await.map_err(AiSummaryError::from)
            }
        }
    }

    async fn get_or_init_gemini(&self, cfg: &LlmModelConfig) -> Result<Arc<GeminiService>> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.gemini.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let cli = Arc::new(GeminiService::new(cfg.clone())?);
        let mut w = self.gemini.write().await;
        Ok(w.entry(key).or_insert(cli).clone())
    }

    async fn get_or_init_ollama(&self, cfg: &LlmModelConfig) -> Result<Arc<OllamaService>> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.ollama.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let cli = Arc::new(OllamaService::new(cfg.clone())?);
        let mut w = self.ollama.write().await;
        Ok(w.entry(key).or_insert(cli).clone())
    }
}

/// Cache key identifying one HTTP client configuration.
#[derive(Clone, PartialEq, Eq, Hash)]
struct ClientKey {
    provider: LlmProvider,
    model: String,
    endpoint: String,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
}

impl From<&LlmModelConfig> for ClientKey {
    fn from(cfg: &LlmModelConfig) -> Self {
        Self {
            provider: cfg.provider,
            model: cfg.model.clone(),
            endpoint: cfg.endpoint.clone(),
            api_key: cfg.api_key.clone(),
            timeout_secs: cfg.timeout_secs,
        }
    }
}
