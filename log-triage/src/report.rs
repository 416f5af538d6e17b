//! Local report formatting and assembly of the summarizer input.

use crate::collector::{ErrorEntry, ErrorSummary};

/// Character budget for the text handed to the external summarizer.
pub const MAX_AI_INPUT_CHARS: usize = 15_000;

/// Formats one visible entry as `[SEVERITY] text`.
pub fn format_entry(entry: &ErrorEntry) -> String {
    format!("[{}] {}", entry.severity.label(), entry.text)
}

/// Builds the human-readable local report: size counts, the summary table
/// sorted by descending count (ties broken by label for determinism), then
/// the visible entries.
pub fn build_local_report(
    original: &str,
    excerpt: &str,
    summary: &ErrorSummary,
    visible: &[ErrorEntry],
) -> String {
    let mut out = String::new();

    out.push_str("Android log triage report\n");
    out.push_str("=========================\n");
    out.push_str(&format!(
        "Original log:   {} lines, {} chars\n",
        original.lines().count(),
        original.chars().count()
    ));
    out.push_str(&format!(
        "Ranked excerpt: {} lines, {} chars\n\n",
        excerpt.lines().count(),
        excerpt.chars().count()
    ));

    if summary.is_empty() {
        out.push_str("No error keywords detected.\n");
    } else {
        out.push_str("Most common error types:\n");
        let mut rows: Vec<(&String, &usize)> = summary.iter().collect();
        rows.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (label, count) in rows {
            out.push_str(&format!("  {label}: {count}\n"));
        }
    }
    out.push('\n');

    if visible.is_empty() {
        out.push_str("No entries match the selected levels.\n");
    } else {
        out.push_str(&format!("Visible entries ({}):\n", visible.len()));
        for entry in visible {
            out.push_str(&format_entry(entry));
            out.push('\n');
        }
    }

    out
}

/// Builds the text handed to the summarizer: the visible entries joined as
/// `[SEVERITY] text` lines, falling back to the full ranked excerpt when
/// nothing is visible, truncated to [`MAX_AI_INPUT_CHARS`].
pub fn build_ai_input(visible: &[ErrorEntry], excerpt: &str) -> String {
    let joined = if visible.is_empty() {
        excerpt.to_string()
    } else {
        visible
            .iter()
            .map(format_entry)
            .collect::<Vec<_>>()
            .join("\n")
    };
    truncate_chars(&joined, MAX_AI_INPUT_CHARS)
}

/// Returns the first `max` characters of `s`, cutting on a char boundary.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((byte_idx, _)) => s[..byte_idx].to_string(),
        None => s.to_string(),
    }
}
