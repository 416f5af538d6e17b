//! Public entry for the Android log triage pipeline.
//!
//! Single high-level flow that compresses an unbounded device log into a
//! small, high-signal excerpt suitable for human review and language-model
//! consumption:
//!
//! 1) **Step 1 — Crash-block ranking**
//!    - Score every line against a fixed marker/weight table
//!    - Cut a clamped context window around each scoring line
//!    - Keep the top-N windows, joined in ranked order (identity fallback
//!      when the log carries no recognizable markers)
//!
//! 2) **Step 2 — Error collection**
//!    - Scan the excerpt for error/exception keywords
//!    - Tag each matching line with its detected severity (Unknown when no
//!      line shape matches)
//!    - Count every individual keyword match for the frequency summary
//!
//! 3) **Step 3 — Level filtering & ordering**
//!    - Apply the level-set selection policy, with the "show all" fallback
//!      when the log never carried a real severity marker
//!    - Sort by (severity priority, source index)
//!
//! 4) **Step 4 — Reporting & summarization**
//!    - Format the local report and the AI input (bounded to a fixed
//!      character budget)
//!    - Hand the prompt to `ai-summary-service`; a summarizer failure
//!      degrades to a substitute message, never a propagated fault
//!
//! The pipeline uses `tracing` for debug logging. All stages are pure,
//! request-local transforms over in-memory text; the fixed pattern tables
//! are read-only and safe to share across concurrent invocations.

pub mod collector;
pub mod errors;
pub mod filter;
pub mod pipeline;
pub mod prompt;
pub mod ranker;
pub mod report;
pub mod severity;

pub use collector::{CollectedErrors, ErrorEntry, ErrorSummary};
pub use errors::{Error, TriageResult};
pub use pipeline::{
    AI_UNAVAILABLE_NOTICE, AnalysisRequest, TriageOutcome, TriageReport, all_real_levels, analyze,
    run_analysis,
};
pub use severity::{Severity, parse_level_set};
