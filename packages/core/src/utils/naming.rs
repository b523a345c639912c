//! Export name sanitizing
//!
//! Builds file-system and archive safe slugs from author-provided labels.
//! The result only ever contains `[A-Za-z0-9_-]`.

use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

/// Compiled regex for whitespace runs (collapsed to one hyphen)
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Compiled regex for every character outside the allowed slug alphabet
static DISALLOWED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_-]").unwrap());

/// Build a slug from name parts
///
/// Blank parts are dropped, each part is trimmed, internal whitespace runs
/// become a single hyphen, disallowed characters are stripped, and surviving
/// parts are joined with hyphens.
///
/// Never fails. When every part is blank the result is the empty string;
/// callers that need a non-empty name must substitute one themselves (see
/// [`timestamp_name`]).
///
/// # Examples
///
/// ```
/// use voicespace_core::utils::sanitize;
///
/// assert_eq!(sanitize(&["My App", "Intro!!"]), "My-App-Intro");
/// assert_eq!(sanitize(&["", "  "]), "");
/// assert_eq!(sanitize(&["Tour", "Section 1", "Part 2"]), "Tour-Section-1-Part-2");
/// ```
pub fn sanitize<S: AsRef<str>>(parts: &[S]) -> String {
    parts
        .iter()
        .map(|part| part.as_ref().trim())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let hyphenated = WHITESPACE_RE.replace_all(part, "-");
            DISALLOWED_RE.replace_all(&hyphenated, "").into_owned()
        })
        .filter(|slug| !slug.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Fallback name for exports whose labels sanitize to nothing
pub fn timestamp_name(prefix: &str, at: DateTime<Utc>) -> String {
    format!("{}-{}", prefix, at.format("%Y%m%d-%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_basic_parts() {
        assert_eq!(sanitize(&["My App", "Intro!!"]), "My-App-Intro");
        assert_eq!(sanitize(&["app", "feature"]), "app-feature");
    }

    #[test]
    fn test_blank_parts_are_dropped() {
        assert_eq!(sanitize(&["", "  "]), "");
        assert_eq!(sanitize(&["App", "", "Feature"]), "App-Feature");
        assert_eq!(sanitize::<&str>(&[]), "");
    }

    #[test]
    fn test_whitespace_runs_collapse() {
        assert_eq!(sanitize(&["  Big \t\n  Gap  "]), "Big-Gap");
    }

    #[test]
    fn test_disallowed_characters_are_stripped() {
        assert_eq!(sanitize(&["Café/Bar: v1.2"]), "CafBar-v12");
        assert_eq!(sanitize(&["snake_case-ok"]), "snake_case-ok");
    }

    #[test]
    fn test_parts_made_only_of_symbols_vanish() {
        // "!!!" survives the blank filter but strips to nothing
        assert_eq!(sanitize(&["App", "!!!", "Intro"]), "App-Intro");
    }

    #[test]
    fn test_accepts_owned_strings() {
        let parts = vec!["Tour".to_string(), "Part 1".to_string()];
        assert_eq!(sanitize(&parts), "Tour-Part-1");
    }

    #[test]
    fn test_timestamp_name() {
        let at = Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(timestamp_name("voicespace", at), "voicespace-20260304-050607");
    }
}
