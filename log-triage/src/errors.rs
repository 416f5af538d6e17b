//! Crate-wide error type for log-triage.
//!
//! The internal stages (parser, ranker, collector, filter) are pure functions
//! over well-formed strings and cannot fail; the only errors a caller can see
//! are caller-input errors. A summarizer failure is recovered inside the
//! orchestrator and never surfaces here.

use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type TriageResult<T> = Result<T, Error>;

/// Root error type for the log-triage crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The request carried no log text at all. Distinct from "processed,
    /// found nothing", which is a normal empty result.
    #[error("empty input: the request carried no log text")]
    EmptyInput,

    /// Input validation errors (unrecognized level names, etc.).
    #[error("validation error: {0}")]
    Validation(String),
}
