//! Line splitting.

use regex::Regex;
use std::sync::LazyLock;

/// Runs of line-ending characters, in any mix.
static LINE_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\n\r]+").expect("valid regex"));

/// Split text on runs of `\n`/`\r` and drop lines that are only whitespace.
///
/// The first element, when present, is the header line.
pub fn split_lines(text: &str) -> Vec<&str> {
    LINE_BREAKS
        .split(text)
        .filter(|line| line.chars().any(|c| !is_blank(c)))
        .collect()
}

/// Unicode whitespace plus the byte-order mark, minus NEL (U+0085).
///
/// A line holding nothing but a stray BOM is blank.
fn is_blank(c: char) -> bool {
    match c {
        '\u{feff}' => true,
        '\u{85}' => false,
        _ => c.is_whitespace(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_nothing() {
        assert!(split_lines("").is_empty());
        assert!(split_lines("\n\r\n").is_empty());
    }

    #[test]
    fn mixed_line_endings_collapse() {
        assert_eq!(split_lines("a\r\nb\rc\n\n\nd"), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn whitespace_only_lines_are_dropped() {
        assert_eq!(split_lines("a;b\n  \t \nc;d\n"), vec!["a;b", "c;d"]);
    }

    #[test]
    fn bom_only_line_is_blank() {
        assert_eq!(split_lines("\u{feff}\na;b\n1;2"), vec!["a;b", "1;2"]);
        assert_eq!(split_lines("a;b\n \u{feff}\u{a0}\n1;2"), vec!["a;b", "1;2"]);
    }

    #[test]
    fn bom_before_header_text_is_kept() {
        assert_eq!(split_lines("\u{feff}a;b\n1;2"), vec!["\u{feff}a;b", "1;2"]);
    }

    #[test]
    fn next_line_control_is_content() {
        assert_eq!(split_lines("a;b\n\u{85}\n"), vec!["a;b", "\u{85}"]);
    }

    #[test]
    fn surrounding_whitespace_is_kept() {
        assert_eq!(split_lines("  a;b  \n"), vec!["  a;b  "]);
    }
}
