//! Android severity levels and per-line severity detection.
//!
//! A logcat line can spell its priority in several shapes depending on the
//! capture tool (`threadtime` dumps, `brief` dumps, bare `E/Tag` prefixes).
//! Detection is a priority-ordered list of line-shape patterns tried in
//! sequence; the first matching shape wins. More specific shapes come first
//! so that ambiguous input is never claimed by a more permissive pattern.

use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::{Error, TriageResult};

/// Android log priority, plus a sentinel for lines that carry none.
///
/// Declaration order doubles as the fixed triage priority: `Error` sorts
/// first, `Unknown` last. `Unknown` is a real variant, not an absence — it
/// participates in ordering and in the "did this log ever show a real
/// severity" decision downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Debug,
    Verbose,
    Unknown,
}

impl Severity {
    /// Fixed triage priority: lower is more severe. `Unknown` ranks last.
    pub fn priority(self) -> u8 {
        match self {
            Severity::Error => 0,
            Severity::Warning => 1,
            Severity::Info => 2,
            Severity::Debug => 3,
            Severity::Verbose => 4,
            Severity::Unknown => 5,
        }
    }

    /// Uppercase label used in report lines (`[ERROR] ...`).
    pub fn label(self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
            Severity::Debug => "DEBUG",
            Severity::Verbose => "VERBOSE",
            Severity::Unknown => "UNKNOWN",
        }
    }

    /// Maps a logcat priority letter to a severity.
    pub fn from_letter(letter: char) -> Option<Severity> {
        match letter {
            'E' => Some(Severity::Error),
            'W' => Some(Severity::Warning),
            'I' => Some(Severity::Info),
            'D' => Some(Severity::Debug),
            'V' => Some(Severity::Verbose),
            _ => None,
        }
    }

    /// Parses a human-entered level name (`error`, `W`, `VERBOSE`, ...).
    pub fn from_name(name: &str) -> Option<Severity> {
        match name.trim().to_ascii_lowercase().as_str() {
            "e" | "error" => Some(Severity::Error),
            "w" | "warning" | "warn" => Some(Severity::Warning),
            "i" | "info" => Some(Severity::Info),
            "d" | "debug" => Some(Severity::Debug),
            "v" | "verbose" => Some(Severity::Verbose),
            "unknown" => Some(Severity::Unknown),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

lazy_static! {
    /// Line-shape patterns in priority order; each captures the priority letter.
    ///
    /// 1. Full `threadtime` form: `MM-DD HH:MM:SS.fff <anything> E <tag>`.
    /// 2. Simple form: optional indent, priority letter, whitespace, tag token.
    /// 3. Slash form: optional indent, `E/<tag>`.
    static ref LINE_SHAPES: [Regex; 3] = [
        Regex::new(r"^\d{2}-\d{2}\s+\d{2}:\d{2}:\d{2}\.\d+\s+(?:.*?\s)?([EWIDV])\s")
            .expect("full timestamp shape"),
        Regex::new(r"^\s*([EWIDV])\s+[A-Za-z0-9._$:/-]+").expect("simple shape"),
        Regex::new(r"^\s*([EWIDV])/[A-Za-z0-9._$-]+").expect("slash shape"),
    ];
}

/// Classifies a single line, returning `None` when no shape matches.
///
/// The caller decides the fallback for undetected lines (the collector
/// substitutes [`Severity::Unknown`]).
pub fn classify(line: &str) -> Option<Severity> {
    for shape in LINE_SHAPES.iter() {
        if let Some(caps) = shape.captures(line) {
            let letter = caps.get(1)?.as_str().chars().next()?;
            return Severity::from_letter(letter);
        }
    }
    None
}

/// Parses a comma-separated level selection (e.g. `"error,warning"`).
///
/// # Errors
/// [`Error::Validation`] when a token is not a recognized level name.
pub fn parse_level_set(spec: &str) -> TriageResult<std::collections::HashSet<Severity>> {
    let mut set = std::collections::HashSet::new();
    for token in spec.split(',').filter(|t| !t.trim().is_empty()) {
        let level = Severity::from_name(token)
            .ok_or_else(|| Error::Validation(format!("unknown level name: {:?}", token.trim())))?;
        set.insert(level);
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threadtime_line_yields_embedded_letter() {
        let line = "03-17 10:32:01.123  1234  5678 E AndroidRuntime: FATAL EXCEPTION: main";
        assert_eq!(classify(line), Some(Severity::Error));

        let line = "11-02 23:59:59.9 999 1 W ActivityManager: slow operation";
        assert_eq!(classify(line), Some(Severity::Warning));
    }

    #[test]
    fn simple_form_matches_letter_then_tag() {
        assert_eq!(classify("E NetworkScheduler: job timed out"), Some(Severity::Error));
        assert_eq!(classify("   I art: GC freed 2048KB"), Some(Severity::Info));
        // Tag tokens may carry slashes and colons in the simple form.
        assert_eq!(classify("D com.app/MainActivity: resumed"), Some(Severity::Debug));
    }

    #[test]
    fn slash_form_matches_letter_slash_tag() {
        assert_eq!(classify("W/ActivityManager(  421): timeout"), Some(Severity::Warning));
        assert_eq!(classify("  V/chatty: uid=1000"), Some(Severity::Verbose));
    }

    #[test]
    fn first_matching_shape_wins() {
        // Matches the timestamp shape; the letter right after the timestamp is
        // taken even though the remainder looks like a slash-form prefix.
        let line = "05-12 07:01:02.345 E I/tag: nested";
        assert_eq!(classify(line), Some(Severity::Error));

        // Simple form claims the leading letter before the slash form could
        // ever see the embedded `I/tag` token.
        assert_eq!(classify("V I/tag: nested"), Some(Severity::Verbose));
    }

    #[test]
    fn unmatched_lines_have_no_severity() {
        assert_eq!(classify("FATAL EXCEPTION: main"), None);
        assert_eq!(classify("plain text without any marker"), None);
        assert_eq!(classify(""), None);
        // X is not an Android priority letter.
        assert_eq!(classify("X/tag: nope"), None);
    }

    #[test]
    fn priority_order_is_fixed() {
        assert!(Severity::Error.priority() < Severity::Warning.priority());
        assert!(Severity::Warning.priority() < Severity::Info.priority());
        assert!(Severity::Info.priority() < Severity::Debug.priority());
        assert!(Severity::Debug.priority() < Severity::Verbose.priority());
        assert!(Severity::Verbose.priority() < Severity::Unknown.priority());
        // Derived Ord agrees with the explicit priority table.
        assert!(Severity::Error < Severity::Unknown);
    }

    #[test]
    fn level_set_parsing() {
        let set = parse_level_set("error, w,INFO").expect("valid spec");
        assert!(set.contains(&Severity::Error));
        assert!(set.contains(&Severity::Warning));
        assert!(set.contains(&Severity::Info));
        assert_eq!(set.len(), 3);

        assert!(parse_level_set("error,bogus").is_err());
    }
}
