//! Error collection: scan the ranked excerpt for error/exception keywords,
//! tag each hit with its severity, and build a frequency summary.
//!
//! Counting is deliberately asymmetric: one [`ErrorEntry`] per matching
//! *line*, but one summary increment per keyword *match*. A line containing
//! both "Error" and "Crash" yields a single entry and two summary counts.
//! The summary feeds the "most common error types" view and must keep raw
//! match counts.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::severity::{self, Severity};

/// One detected error/exception occurrence. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEntry {
    /// Detected severity; [`Severity::Unknown`] when no line shape matched.
    pub severity: Severity,
    /// The full matching line.
    pub text: String,
    /// Zero-based line index within the scanned excerpt.
    pub source_index: usize,
}

/// Occurrence count per normalized error-type label. Insert/update only.
pub type ErrorSummary = HashMap<String, usize>;

/// Result of one collection pass over the excerpt lines.
#[derive(Debug, Clone)]
pub struct CollectedErrors {
    /// One entry per matching line, in discovery order.
    pub entries: Vec<ErrorEntry>,
    /// Raw keyword-match counts keyed by title-cased token.
    pub summary: ErrorSummary,
    /// True iff at least one entry carries a non-Unknown severity; computed
    /// once across the whole scan.
    pub has_real_levels: bool,
}

lazy_static! {
    // Leftmost-first alternation, no word boundaries: the broad tokens match
    // mid-word (FooException -> Exception) while the named exceptions win at
    // their own start position (RuntimeException stays whole).
    static ref ERROR_KEYWORDS: Regex = Regex::new(
        r"(?i)Exception|Error|Fail|Crash|ANR|NullPointerException|OutOfMemoryError|RuntimeException",
    )
    .expect("error keyword pattern");
}

/// Scans ordered lines for error keywords.
pub fn collect<'a, I>(lines: I) -> CollectedErrors
where
    I: IntoIterator<Item = &'a str>,
{
    let mut entries = Vec::new();
    let mut summary = ErrorSummary::new();
    let mut has_real_levels = false;

    for (source_index, line) in lines.into_iter().enumerate() {
        if !ERROR_KEYWORDS.is_match(line) {
            continue;
        }

        let detected = severity::classify(line).unwrap_or(Severity::Unknown);
        if detected != Severity::Unknown {
            has_real_levels = true;
        }

        for hit in ERROR_KEYWORDS.find_iter(line) {
            let label = title_case(hit.as_str().trim());
            *summary.entry(label).or_insert(0) += 1;
        }

        entries.push(ErrorEntry {
            severity: detected,
            text: line.to_string(),
            source_index,
        });
    }

    debug!(
        entries = entries.len(),
        labels = summary.len(),
        has_real_levels,
        "collected error entries"
    );

    CollectedErrors {
        entries,
        summary,
        has_real_levels,
    }
}

/// Normalizes a matched token: first character uppercase, rest lowercase.
fn title_case(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_entry_per_line_but_one_count_per_match() {
        let out = collect(["Error while saving caused a Crash"]);
        assert_eq!(out.entries.len(), 1);
        assert_eq!(out.summary.get("Error"), Some(&1));
        assert_eq!(out.summary.get("Crash"), Some(&1));
        assert_eq!(out.summary.values().sum::<usize>(), 2);
    }

    #[test]
    fn matching_is_case_insensitive_and_title_cased() {
        let out = collect(["total FAILURE", "an error occurred"]);
        assert_eq!(out.entries.len(), 2);
        assert_eq!(out.summary.get("Fail"), Some(&1));
        assert_eq!(out.summary.get("Error"), Some(&1));
    }

    #[test]
    fn named_exceptions_win_at_their_own_start() {
        let out = collect(["RuntimeException thrown", "OutOfMemoryError hit"]);
        assert_eq!(out.summary.get("Runtimeexception"), Some(&1));
        assert_eq!(out.summary.get("Outofmemoryerror"), Some(&1));
        // The broad tokens did not double-count inside the named ones.
        assert_eq!(out.summary.get("Exception"), None);
        assert_eq!(out.summary.get("Error"), None);
    }

    #[test]
    fn broad_tokens_match_mid_word() {
        let out = collect(["caught CustomException in handler"]);
        assert_eq!(out.summary.get("Exception"), Some(&1));
    }

    #[test]
    fn severity_comes_from_the_line_shape() {
        let out = collect([
            "E AndroidRuntime: FATAL EXCEPTION: main",
            "FATAL EXCEPTION without a priority letter",
        ]);
        assert_eq!(out.entries[0].severity, Severity::Error);
        assert_eq!(out.entries[1].severity, Severity::Unknown);
        assert!(out.has_real_levels);
    }

    #[test]
    fn has_real_levels_false_when_every_entry_is_unknown() {
        let out = collect(["something failed", "Crash dump follows"]);
        assert!(!out.has_real_levels);
        assert!(out.entries.iter().all(|e| e.severity == Severity::Unknown));
    }

    #[test]
    fn source_index_points_into_the_scanned_lines() {
        let lines = ["quiet", "Error here", "quiet", "Crash there"];
        let out = collect(lines);
        assert_eq!(out.entries[0].source_index, 1);
        assert_eq!(out.entries[1].source_index, 3);
        for entry in &out.entries {
            assert_eq!(lines[entry.source_index], entry.text);
        }
    }

    #[test]
    fn non_matching_lines_produce_nothing() {
        let out = collect(["all good", "still fine"]);
        assert!(out.entries.is_empty());
        assert!(out.summary.is_empty());
        assert!(!out.has_real_levels);
    }
}
