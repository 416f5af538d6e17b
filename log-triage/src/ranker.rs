//! Crash-block ranking: compress an unbounded log into a bounded,
//! relevance-ordered excerpt.
//!
//! Every line is scored against a fixed marker table (substring containment,
//! case-sensitive, additive when several markers hit the same line). Each
//! scoring line contributes a context window of `context_radius` lines on
//! both sides, clamped to the text bounds. Windows are stable-sorted by
//! descending score and at most `max_blocks` survive, which bounds the slice
//! fed to local analysis and to the external summarizer regardless of input
//! size.
//!
//! A log with no recognizable markers is not an error: the input passes
//! through unchanged and downstream stages handle the "no signal" case.

use tracing::debug;

/// Marker substrings and their relevance weights. Read-only; shared freely.
const MARKER_WEIGHTS: &[(&str, u32)] = &[
    ("FATAL EXCEPTION", 3),
    ("java.lang.", 3),
    ("SIGABRT", 3),
    ("signal 6", 3),
    ("Abort message", 3),
    ("OutOfMemoryError", 3),
    ("Process ", 2),
    ("has died", 2),
    ("ANR in", 2),
    ("ANR:", 2),
    ("Error", 1),
    ("Fail", 1),
    ("Crash", 1),
];

/// Context window half-size in lines.
pub const DEFAULT_CONTEXT_RADIUS: usize = 25;

/// Upper bound on ranked windows kept in the excerpt.
pub const DEFAULT_MAX_BLOCKS: usize = 30;

/// Literal delimiter between ranked windows in the joined excerpt. Must not
/// contain any collector keyword or ranker marker, or the delimiter itself
/// would be picked up by the downstream scan.
pub const BLOCK_DELIMITER: &str = "\n--- triage block ---\n";

/// One contiguous window around a scoring line. Internal to the ranker;
/// discarded once the joined excerpt is assembled.
struct CrashBlock {
    score: u32,
    text: String,
}

/// Extracts the ranked excerpt with the default radius and block cap.
pub fn extract(text: &str) -> String {
    extract_with(text, DEFAULT_CONTEXT_RADIUS, DEFAULT_MAX_BLOCKS)
}

/// Extracts the ranked excerpt with explicit bounds.
///
/// Identity fallback: when no line scores above zero the input is returned
/// unchanged.
pub fn extract_with(text: &str, context_radius: usize, max_blocks: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();

    let mut blocks: Vec<CrashBlock> = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        let score: u32 = MARKER_WEIGHTS
            .iter()
            .filter(|(marker, _)| line.contains(marker))
            .map(|(_, weight)| *weight)
            .sum();
        if score == 0 {
            continue;
        }

        let start = idx.saturating_sub(context_radius);
        let end = (idx + context_radius + 1).min(lines.len());
        blocks.push(CrashBlock {
            score,
            text: lines[start..end].join("\n"),
        });
    }

    if blocks.is_empty() {
        debug!("no crash markers found; passing the log through unchanged");
        return text.to_string();
    }

    // Stable sort: equal scores keep discovery order.
    blocks.sort_by(|a, b| b.score.cmp(&a.score));
    blocks.truncate(max_blocks);
    debug!(kept = blocks.len(), "ranked crash blocks");

    blocks
        .iter()
        .map(|b| b.text.as_str())
        .collect::<Vec<_>>()
        .join(BLOCK_DELIMITER)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_lines(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("line {i}")).collect()
    }

    #[test]
    fn no_markers_is_identity() {
        let text = numbered_lines(50).join("\n");
        assert_eq!(extract(&text), text);
        assert_eq!(extract_with("", 25, 30), "");
    }

    #[test]
    fn single_marker_window_is_clamped_to_radius() {
        let mut lines = numbered_lines(100);
        lines[40] = "FATAL EXCEPTION: java.lang.RuntimeException".to_string();
        let text = lines.join("\n");

        let excerpt = extract_with(&text, 25, 30);
        let out: Vec<&str> = excerpt.lines().collect();
        assert_eq!(out.len(), 51);
        assert_eq!(out[0], "line 15");
        assert_eq!(out[50], "line 65");
        assert!(excerpt.contains("FATAL EXCEPTION"));
    }

    #[test]
    fn window_clamps_at_text_bounds() {
        let mut lines = numbered_lines(10);
        lines[1] = "Process com.app has died".to_string();
        let text = lines.join("\n");

        let excerpt = extract_with(&text, 25, 30);
        // Radius larger than the text: the window is the whole text.
        assert_eq!(excerpt.lines().count(), 10);
        assert_eq!(excerpt.lines().next(), Some("line 0"));
    }

    #[test]
    fn keeps_at_most_max_blocks() {
        let text = (0..20)
            .map(|i| format!("Error number {i}"))
            .collect::<Vec<_>>()
            .join("\n");

        let excerpt = extract_with(&text, 0, 3);
        assert_eq!(excerpt.matches(BLOCK_DELIMITER).count(), 2);
        assert_eq!(excerpt.lines().filter(|l| l.starts_with("Error")).count(), 3);
    }

    #[test]
    fn scores_are_additive_and_rank_windows() {
        let text = [
            "Error only",
            "FATAL EXCEPTION: java.lang.IllegalStateException",
            "quiet line",
        ]
        .join("\n");

        // Radius 0: each window is exactly its scoring line. The 3+3 line
        // must outrank the weight-1 line.
        let excerpt = extract_with(&text, 0, 30);
        let first = excerpt.lines().next().unwrap_or_default();
        assert!(first.starts_with("FATAL EXCEPTION"));
    }

    #[test]
    fn equal_scores_preserve_discovery_order() {
        let text = ["Fail first", "noise", "Fail second"].join("\n");
        let excerpt = extract_with(&text, 0, 30);
        let blocks: Vec<&str> = excerpt.split(BLOCK_DELIMITER).collect();
        assert_eq!(blocks, vec!["Fail first", "Fail second"]);
    }
}
