//! Title handling for search-derived items and batch dedup.

use regex::Regex;
use std::sync::LazyLock;

static BRACKETED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\]]+\]\s*").expect("bracket regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex"));

const PRESS_SEPARATOR: &str = " - ";

/// Press name from a trailing `" - Press"` suffix.
pub fn press_suffix(title: &str) -> Option<&str> {
    title
        .rsplit_once(PRESS_SEPARATOR)
        .map(|(_, press)| press.trim())
        .filter(|press| !press.is_empty())
}

/// Title with any `" - Press"` suffix removed.
pub fn strip_press_suffix(title: &str) -> &str {
    title
        .split_once(PRESS_SEPARATOR)
        .map_or(title, |(head, _)| head)
        .trim()
}

/// `"[Press] Title"` display form; the bare title when there is no press.
pub fn format_title_with_press(title: &str, press: Option<&str>) -> String {
    let clean = strip_press_suffix(title);
    match press.map(str::trim).filter(|p| !p.is_empty()) {
        Some(press) => format!("[{press}] {clean}"),
        None => clean.to_string(),
    }
}

/// Key used for title dedup within one batch.
///
/// Drops bracketed prefixes and a trailing press suffix, collapses
/// whitespace, and case-folds.
pub fn canonical_title(title: &str) -> String {
    let without_brackets = BRACKETED.replace_all(title, "");
    let without_press = strip_press_suffix(&without_brackets);
    WHITESPACE.replace_all(without_press, " ").trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_and_suffix_forms_collide() {
        assert_eq!(canonical_title("[PressA] Big Story"), "big story");
        assert_eq!(canonical_title("Big Story - PressB"), "big story");
    }

    #[test]
    fn test_canonical_collapses_whitespace() {
        assert_eq!(canonical_title("  [단독]  Rust   1.90\tReleased "), "rust 1.90 released");
    }

    #[test]
    fn test_press_suffix() {
        assert_eq!(press_suffix("Big Story - Example Times"), Some("Example Times"));
        assert_eq!(press_suffix("A - B - Wire"), Some("Wire"));
        assert_eq!(press_suffix("No press here"), None);
    }

    #[test]
    fn test_format_title_with_press() {
        assert_eq!(
            format_title_with_press("Big Story - Example Times", Some("Example Times")),
            "[Example Times] Big Story"
        );
        assert_eq!(format_title_with_press("Big Story", None), "Big Story");
        assert_eq!(format_title_with_press("Big Story", Some("  ")), "Big Story");
    }
}
