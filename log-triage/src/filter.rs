//! Level-aware filtering and deterministic ordering of error entries.
//!
//! The selection policy is load-bearing for the presentation layer: when the
//! log never showed a real Android severity marker, every entry is Unknown
//! and a level filter would hide everything, so the selection is ignored and
//! the full entry set stays visible.

use std::collections::HashSet;

use crate::collector::ErrorEntry;
use crate::severity::Severity;

/// Applies the level-set selection policy, then sorts.
///
/// - `has_real_levels == true`: Unknown entries are dropped, then only
///   severities in `selected` are kept.
/// - `has_real_levels == false`: `selected` is ignored and every entry is
///   kept.
///
/// The result is ordered by `(severity priority, source_index)` ascending:
/// most severe first, discovery order within a level.
pub fn filter(
    entries: Vec<ErrorEntry>,
    selected: &HashSet<Severity>,
    has_real_levels: bool,
) -> Vec<ErrorEntry> {
    let mut kept: Vec<ErrorEntry> = if has_real_levels {
        entries
            .into_iter()
            .filter(|e| e.severity != Severity::Unknown && selected.contains(&e.severity))
            .collect()
    } else {
        entries
    };

    kept.sort_by_key(|e| (e.severity.priority(), e.source_index));
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(severity: Severity, source_index: usize) -> ErrorEntry {
        ErrorEntry {
            severity,
            text: format!("{severity} at {source_index}"),
            source_index,
        }
    }

    fn all_real() -> HashSet<Severity> {
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

    #[test]
    fn sorts_by_priority_then_source_index() {
        let entries = vec![
            entry(Severity::Warning, 5),
            entry(Severity::Error, 1),
            entry(Severity::Error, 0),
        ];
        let out = filter(entries, &all_real(), true);
        let order: Vec<(Severity, usize)> =
            out.iter().map(|e| (e.severity, e.source_index)).collect();
        assert_eq!(
            order,
            vec![
                (Severity::Error, 0),
                (Severity::Error, 1),
                (Severity::Warning, 5),
            ]
        );
    }

    #[test]
    fn unknown_entries_are_dropped_when_levels_are_real() {
        let entries = vec![entry(Severity::Unknown, 0), entry(Severity::Error, 1)];
        let out = filter(entries, &all_real(), true);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].severity, Severity::Error);
    }

    #[test]
    fn selection_restricts_visible_levels() {
        let entries = vec![
            entry(Severity::Error, 0),
            entry(Severity::Warning, 1),
            entry(Severity::Info, 2),
        ];
        let selected: HashSet<Severity> = [Severity::Warning].into_iter().collect();
        let out = filter(entries, &selected, true);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].severity, Severity::Warning);
    }

    #[test]
    fn selection_is_ignored_without_real_levels() {
        let entries = vec![entry(Severity::Unknown, 3), entry(Severity::Unknown, 1)];
        // Even an empty selection hides nothing.
        let out = filter(entries.clone(), &HashSet::new(), false);
        assert_eq!(out.len(), 2);
        // Equal priority: ordered by source index.
        assert_eq!(out[0].source_index, 1);
        assert_eq!(out[1].source_index, 3);

        let out = filter(entries, &all_real(), false);
        assert_eq!(out.len(), 2);
    }
}
