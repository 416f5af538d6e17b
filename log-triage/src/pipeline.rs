//! Orchestrator: wires ranking, collection, filtering, and formatting into a
//! single run, then hands the excerpt to the external summarizer.
//!
//! The pure stage ([`analyze`]) is synchronous, request-local, and cannot
//! fail on well-formed input; the only caller-input error is an empty
//! request. The async stage ([`run_analysis`]) isolates the one fallible
//! step — the summarizer call — and degrades its failure into a substitute
//! message instead of propagating a fault.

use std::collections::HashSet;

use tracing::{debug, warn};

use ai_summary_service::service_profiles::SummaryServiceProfiles;

use crate::collector::{self, ErrorEntry, ErrorSummary};
use crate::errors::{Error, TriageResult};
use crate::filter;
use crate::prompt;
use crate::ranker;
use crate::report;
use crate::severity::Severity;

/// Substitute summary recorded when every summarizer model failed.
pub const AI_UNAVAILABLE_NOTICE: &str = "AI analysis unavailable.";

/// One analysis invocation. Fully consumed by a single run; no cross-request
/// state is kept anywhere in the pipeline.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// The raw, already decoded log text.
    pub raw_text: String,
    /// Severity levels the caller wants to see.
    pub selected_levels: HashSet<Severity>,
    /// Optional summarizer model override (provider default otherwise).
    pub model_choice: Option<String>,
}

impl AnalysisRequest {
    /// Request with the default selection: every real severity visible.
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            selected_levels: all_real_levels(),
            model_choice: None,
        }
    }
}

/// The default level selection: all five real severities.
pub fn all_real_levels() -> HashSet<Severity> {
    [
        Severity::Error,
        Severity::Warning,
        Severity::Info,
        Severity::Debug,
        Severity::Verbose,
    ]
    .into_iter()
    .collect()
}

/// Everything the local (non-AI) stage produces.
#[derive(Debug, Clone)]
pub struct TriageOutcome {
    /// The ranked excerpt the rest of the pipeline operated on.
    pub excerpt: String,
    /// Full pre-filter entry set in discovery order.
    pub entries: Vec<ErrorEntry>,
    /// Raw keyword-match counts.
    pub summary: ErrorSummary,
    /// Whether the log ever showed a real Android severity marker.
    pub has_real_levels: bool,
    /// Entries surviving the level filter, in (priority, index) order.
    pub visible: Vec<ErrorEntry>,
    /// Formatted local report.
    pub local_report: String,
    /// Truncated text destined for the summarizer.
    pub ai_input: String,
    /// Set when no real severities existed anywhere: the full Unknown-only
    /// entry set, surfaced so the caller can flag that level filtering was
    /// impossible for this log.
    pub needs_attention: Option<Vec<ErrorEntry>>,
}

/// Result of a full run including the external summarizer step.
#[derive(Debug, Clone)]
pub struct TriageReport {
    /// The local stage output.
    pub outcome: TriageOutcome,
    /// The model's summary, or [`AI_UNAVAILABLE_NOTICE`] on failure.
    pub ai_summary: String,
    /// The summarizer failure, if any, for optional display.
    pub ai_error: Option<String>,
}

/// Runs the local stage: raw text → ranked excerpt → collected entries →
/// filtered entries → report + AI input.
///
/// # Errors
/// [`Error::EmptyInput`] when the request text is empty after trimming.
pub fn analyze(request: &AnalysisRequest) -> TriageResult<TriageOutcome> {
    if request.raw_text.trim().is_empty() {
        return Err(Error::EmptyInput);
    }

    debug!(chars = request.raw_text.len(), "triage: rank crash blocks");
    let excerpt = ranker::extract(&request.raw_text);

    debug!("triage: collect error entries");
    let collected = collector::collect(excerpt.lines());
    let needs_attention = if collected.has_real_levels {
        None
    } else {
        Some(collected.entries.clone())
    };

    debug!("triage: apply level filter");
    let visible = filter::filter(
        collected.entries.clone(),
        &request.selected_levels,
        collected.has_real_levels,
    );

    let local_report =
        report::build_local_report(&request.raw_text, &excerpt, &collected.summary, &visible);
    let ai_input = report::build_ai_input(&visible, &excerpt);

    Ok(TriageOutcome {
        excerpt,
        entries: collected.entries,
        summary: collected.summary,
        has_real_levels: collected.has_real_levels,
        visible,
        local_report,
        ai_input,
        needs_attention,
    })
}

/// Runs the whole pipeline: the local stage plus the summarizer call.
///
/// A summarizer failure is recovered here: the report carries
/// [`AI_UNAVAILABLE_NOTICE`] and the error string, and the call still
/// succeeds.
///
/// # Errors
/// Only caller-input errors from [`analyze`].
pub async fn run_analysis(
    svc: &SummaryServiceProfiles,
    request: AnalysisRequest,
) -> TriageResult<TriageReport> {
    let outcome = analyze(&request)?;

    let ai_prompt = prompt::build_summary_prompt(&outcome.ai_input);
    let (ai_summary, ai_error) = match svc
        .summarize(&ai_prompt, request.model_choice.as_deref())
        .await
    {
        Ok(text) => (text, None),
        Err(err) => {
            warn!(error = %err, "summarizer failed; substituting failure notice");
            (AI_UNAVAILABLE_NOTICE.to_string(), Some(err.to_string()))
        }
    };

    Ok(TriageReport {
        outcome,
        ai_summary,
        ai_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_a_distinct_error() {
        let request = AnalysisRequest::new("   \n\t  ");
        assert!(matches!(analyze(&request), Err(Error::EmptyInput)));
    }

    #[test]
    fn no_signal_log_passes_through_with_empty_results() {
        let request = AnalysisRequest::new("hello\nworld");
        let outcome = analyze(&request).expect("non-empty input");
        assert_eq!(outcome.excerpt, "hello\nworld");
        assert!(outcome.entries.is_empty());
        assert!(outcome.visible.is_empty());
        assert!(!outcome.has_real_levels);
        // Nothing matched, so the Unknown-only artifact is an empty set.
        assert_eq!(outcome.needs_attention.as_deref(), Some(&[][..]));
        // With no visible entries the AI input falls back to the excerpt.
        assert_eq!(outcome.ai_input, "hello\nworld");
    }

    #[test]
    fn real_levels_suppress_the_needs_attention_artifact() {
        let request = AnalysisRequest::new("E AndroidRuntime: FATAL EXCEPTION: main");
        let outcome = analyze(&request).expect("non-empty input");
        assert!(outcome.has_real_levels);
        assert!(outcome.needs_attention.is_none());
        assert_eq!(outcome.visible.len(), 1);
        assert!(outcome.ai_input.starts_with("[ERROR]"));
    }

    #[test]
    fn ai_input_respects_the_char_budget() {
        // One very long marker-bearing line blows past the budget.
        let big = format!("Error {}", "x".repeat(40_000));
        let outcome = analyze(&AnalysisRequest::new(big)).expect("non-empty input");
        assert_eq!(
            outcome.ai_input.chars().count(),
            report::MAX_AI_INPUT_CHARS
        );
    }
}
