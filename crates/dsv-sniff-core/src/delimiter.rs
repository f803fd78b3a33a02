//! Candidate delimiters and quote-aware delimiter counting.
//!
//! The candidate set is closed: comma, semicolon, tab and pipe. A scan walks
//! a span once, flipping a local "inside quotes" toggle on every `"` and
//! tallying each candidate seen outside quotes.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One of the four field separators the sniffer knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// Horizontal tab.
    Tab,
    /// `|`
    Pipe,
}

impl Delimiter {
    /// Every candidate, in tally order.
    pub const ALL: [Self; 4] = [Self::Comma, Self::Semicolon, Self::Tab, Self::Pipe];

    /// The character this delimiter stands for.
    pub const fn as_char(self) -> char {
        match self {
            Self::Comma => ',',
            Self::Semicolon => ';',
            Self::Tab => '\t',
            Self::Pipe => '|',
        }
    }

    /// Map a character back to its candidate, if it is one.
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            ',' => Some(Self::Comma),
            ';' => Some(Self::Semicolon),
            '\t' => Some(Self::Tab),
            '|' => Some(Self::Pipe),
            _ => None,
        }
    }

    /// Lowercase name, as accepted on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Comma => "comma",
            Self::Semicolon => "semicolon",
            Self::Tab => "tab",
            Self::Pipe => "pipe",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Comma => 0,
            Self::Semicolon => 1,
            Self::Tab => 2,
            Self::Pipe => 3,
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse a user-supplied delimiter.
///
/// Accepts a candidate's name (`comma`, `semicolon`, `tab`, `pipe`, any
/// case), the escape `\t`, or any single character. A single character
/// outside the candidate set is returned as-is; it just never matches.
pub fn parse_delimiter(input: &str) -> Option<char> {
    if let Some(d) = Delimiter::ALL
        .into_iter()
        .find(|d| d.name().eq_ignore_ascii_case(input))
    {
        return Some(d.as_char());
    }
    if input == "\\t" {
        return Some('\t');
    }
    let mut chars = input.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Unquoted occurrence counts for every candidate delimiter in one span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DelimiterTally {
    counts: [usize; 4],
}

impl DelimiterTally {
    /// Count for a candidate delimiter.
    pub const fn get(&self, delimiter: Delimiter) -> usize {
        self.counts[delimiter.index()]
    }

    /// Count for an arbitrary character. Anything outside the candidate set
    /// is never tallied, so it reads as zero.
    pub fn count_of(&self, c: char) -> usize {
        Delimiter::from_char(c).map_or(0, |d| self.get(d))
    }

    /// Iterate `(delimiter, count)` pairs in tally order.
    pub fn iter(&self) -> impl Iterator<Item = (Delimiter, usize)> + '_ {
        Delimiter::ALL.into_iter().map(|d| (d, self.get(d)))
    }

    /// The first candidate other than `expected` whose count strictly
    /// exceeds the expected character's count.
    pub fn dominant_competitor(&self, expected: char) -> Option<(Delimiter, usize)> {
        let expected_count = self.count_of(expected);
        self.iter()
            .filter(|&(d, _)| d.as_char() != expected)
            .find(|&(_, count)| count > expected_count)
    }

    const fn bump(&mut self, delimiter: Delimiter) {
        self.counts[delimiter.index()] += 1;
    }
}

/// Tally candidate delimiters in `span`, skipping anything inside quotes.
///
/// The quote handling is a plain toggle: every `"` flips it, so an escaped
/// `""` inside a quoted field counts as two flips and leaves the state as it
/// was. `None` and the empty string both yield an all-zero tally.
pub fn count_delimiters(span: Option<&str>) -> DelimiterTally {
    let mut tally = DelimiterTally::default();
    let Some(span) = span else {
        return tally;
    };

    let mut in_quotes = false;
    for c in span.chars() {
        if c == '"' {
            in_quotes = !in_quotes;
        } else if !in_quotes && let Some(delimiter) = Delimiter::from_char(c) {
            tally.bump(delimiter);
        }
    }
    tally
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_candidate() {
        for d in Delimiter::ALL {
            assert_eq!(Delimiter::from_char(d.as_char()), Some(d));
        }
        assert_eq!(Delimiter::from_char(')'), None);
    }

    #[test]
    fn parses_names_escapes_and_single_chars() {
        assert_eq!(parse_delimiter("comma"), Some(','));
        assert_eq!(parse_delimiter("TAB"), Some('\t'));
        assert_eq!(parse_delimiter("\\t"), Some('\t'));
        assert_eq!(parse_delimiter("|"), Some('|'));
        assert_eq!(parse_delimiter(")"), Some(')'));
        assert_eq!(parse_delimiter(""), None);
        assert_eq!(parse_delimiter(";;"), None);
    }

    #[test]
    fn counts_each_candidate_separately() {
        let tally = count_delimiters(Some("a,b;c\td|e,f"));
        assert_eq!(tally.get(Delimiter::Comma), 2);
        assert_eq!(tally.get(Delimiter::Semicolon), 1);
        assert_eq!(tally.get(Delimiter::Tab), 1);
        assert_eq!(tally.get(Delimiter::Pipe), 1);
    }

    #[test]
    fn empty_and_absent_spans_are_zero() {
        assert_eq!(count_delimiters(None), DelimiterTally::default());
        assert_eq!(count_delimiters(Some("")), DelimiterTally::default());
    }

    #[test]
    fn quoted_delimiters_are_skipped() {
        let tally = count_delimiters(Some(r#"a;"b;c";d"#));
        assert_eq!(tally.count_of(';'), 2);
    }

    #[test]
    fn doubled_quote_is_two_toggles() {
        // `""` closes and reopens, so the `;` between the pairs is still quoted.
        let tally = count_delimiters(Some(r#""x""y;z";w"#));
        assert_eq!(tally.count_of(';'), 1);
    }

    #[test]
    fn unbalanced_quote_hides_the_rest_of_the_span() {
        let tally = count_delimiters(Some("a;\"b;c;d"));
        assert_eq!(tally.count_of(';'), 1);
    }

    #[test]
    fn unsupported_character_reads_as_zero() {
        let tally = count_delimiters(Some("a)b)c"));
        assert_eq!(tally.count_of(')'), 0);
    }

    #[test]
    fn dominant_competitor_found_only_when_strictly_greater() {
        let tally = count_delimiters(Some("a;b,c,d"));
        assert_eq!(
            tally.dominant_competitor(';'),
            Some((Delimiter::Comma, 2))
        );

        let tied = count_delimiters(Some("a;b,c"));
        assert_eq!(tied.dominant_competitor(';'), None);
    }
}
