//! Shared AI summary service.
//!
//! Thin clients for hosted Gemini and local Ollama backends, a
//! primary/fallback profile wrapper for resilient summarization, unified
//! error types, best-effort health checks, and a library-scoped tracing
//! layer. Construct [`service_profiles::SummaryServiceProfiles`] once, wrap
//! it in `Arc`, and pass clones to dependents.

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use config::llm_model_config::LlmModelConfig;
pub use config::llm_provider::LlmProvider;
pub use error_handler::{AiSummaryError, Result};
pub use service_profiles::SummaryServiceProfiles;
