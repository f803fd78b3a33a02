//! Delimiter detection.
//!
//! [`detect`] answers one question: is this text a rectangular table whose
//! fields are separated by the requested delimiter? It never suggests a
//! different delimiter. Either the requested one is confirmed or the text is
//! rejected with a [`Rejection`] reason.
//!
//! The check is structural. If every line carries exactly `K` unquoted
//! delimiters, the whole document carries `K × lines` of them, so comparing the
//! header's count against the document-wide count is enough.

use std::borrow::Cow;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::delimiter::{Delimiter, count_delimiters};
use crate::lines::split_lines;

/// Delimiter used when none is requested.
pub const DEFAULT_DELIMITER: char = ';';

/// Input to [`detect`]: text, or bytes to be decoded as UTF-8.
///
/// Invalid UTF-8 sequences are replaced rather than rejected; they can never
/// be a delimiter, so they don't change the outcome.
#[derive(Debug, Clone, Copy)]
pub enum Content<'a> {
    /// Already-decoded text.
    Text(&'a str),
    /// Raw bytes.
    Bytes(&'a [u8]),
}

impl<'a> Content<'a> {
    /// Decode to text, borrowing when possible.
    pub fn decode(self) -> Cow<'a, str> {
        match self {
            Self::Text(text) => Cow::Borrowed(text),
            Self::Bytes(bytes) => String::from_utf8_lossy(bytes),
        }
    }
}

impl<'a> From<&'a str> for Content<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a String> for Content<'a> {
    fn from(text: &'a String) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a [u8]> for Content<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::Bytes(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Content<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Self::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for Content<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

/// Per-call detection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectOptions {
    /// The delimiter to confirm.
    pub delimiter: char,
    /// Required number of delimiters on the header line. `None` or `Some(0)`
    /// means any count is accepted.
    pub expected_delimiter_count: Option<usize>,
    /// Reject documents where another candidate delimiter appears more often
    /// than the requested one. Off by default.
    pub reject_competing: bool,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

impl DetectOptions {
    /// Options for confirming `delimiter`, with no other constraints.
    pub const fn new(delimiter: char) -> Self {
        Self {
            delimiter,
            expected_delimiter_count: None,
            reject_competing: false,
        }
    }

    /// Require the header line to carry exactly `count` delimiters.
    pub const fn with_expected_count(mut self, count: usize) -> Self {
        self.expected_delimiter_count = Some(count);
        self
    }

    /// Enable or disable the competing-delimiter check.
    pub const fn with_reject_competing(mut self, reject: bool) -> Self {
        self.reject_competing = reject;
        self
    }
}

/// Why a document was not confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    /// The header's delimiter count differs from the required count.
    HeaderCountMismatch {
        /// Required count.
        expected: usize,
        /// Count found on the header line.
        found: usize,
    },
    /// The header line has no unquoted delimiter (or there is no header).
    NoHeaderDelimiters,
    /// The document as a whole has no unquoted delimiter.
    NoDelimiters,
    /// Another candidate appears more often than the requested delimiter.
    CompetingDelimiter {
        /// The more frequent candidate.
        competitor: Delimiter,
        /// How often it appears.
        count: usize,
        /// How often the requested delimiter appears.
        expected_count: usize,
    },
    /// The document-wide count is not `header_count × line_count`.
    InconsistentCount {
        /// Unquoted delimiters in the whole document.
        document_count: usize,
        /// Unquoted delimiters on the header line.
        header_count: usize,
        /// Non-blank lines.
        line_count: usize,
    },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HeaderCountMismatch { expected, found } => {
                write!(f, "header has {found} delimiters, expected {expected}")
            }
            Self::NoHeaderDelimiters => f.write_str("header line has no delimiter"),
            Self::NoDelimiters => f.write_str("document has no delimiter"),
            Self::CompetingDelimiter {
                competitor,
                count,
                expected_count,
            } => write!(
                f,
                "{competitor} appears {count} times, more than the delimiter ({expected_count})"
            ),
            Self::InconsistentCount {
                document_count,
                header_count,
                line_count,
            } => write!(
                f,
                "{document_count} delimiters over {line_count} lines does not match {header_count} per line"
            ),
        }
    }
}

/// Outcome of [`detect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Detection {
    /// The requested delimiter is in consistent use.
    Detected {
        /// Always the delimiter that was asked about.
        delimiter: char,
    },
    /// The text is not a consistent table for the requested delimiter.
    Rejected(Rejection),
}

impl Detection {
    /// The confirmed delimiter, if any.
    pub const fn delimiter(&self) -> Option<char> {
        match self {
            Self::Detected { delimiter } => Some(*delimiter),
            Self::Rejected(_) => None,
        }
    }

    /// Whether detection succeeded.
    pub const fn is_detected(&self) -> bool {
        matches!(self, Self::Detected { .. })
    }

    /// The rejection reason, if detection failed.
    pub const fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::Detected { .. } => None,
            Self::Rejected(reason) => Some(*reason),
        }
    }
}

/// Serializable summary of one detection, for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DetectionReport {
    /// The delimiter that was checked.
    pub delimiter: char,
    /// Whether it was confirmed.
    pub detected: bool,
    /// Why it was not, when it was not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<Rejection>,
}

impl DetectionReport {
    /// Summarize `detection`, which was run for `delimiter`.
    pub const fn new(delimiter: char, detection: Detection) -> Self {
        Self {
            delimiter,
            detected: detection.is_detected(),
            rejection: detection.rejection(),
        }
    }
}

/// Check that `document_count` is exactly `header_count` per line.
///
/// Zero header or line counts never validate.
pub const fn validate_count(document_count: usize, header_count: usize, line_count: usize) -> bool {
    if header_count == 0 || line_count == 0 {
        return false;
    }
    document_count % header_count == 0
        && document_count % line_count == 0
        && document_count / line_count == header_count
}

/// Confirm whether `content` is consistently separated by `options.delimiter`.
///
/// Runs two linear scans: one over the header line, one over the whole
/// document. Delimiters between double quotes are ignored; quotes may span
/// lines in the document-wide scan.
///
/// # Example
///
/// ```
/// use dsv_sniff_core::{DetectOptions, detect};
///
/// let found = detect("a;b;c\n1;2;3", &DetectOptions::new(';'));
/// assert_eq!(found.delimiter(), Some(';'));
///
/// let ragged = detect("a;b;c\n1;23", &DetectOptions::new(';'));
/// assert_eq!(ragged.delimiter(), None);
/// ```
#[tracing::instrument(skip(content), fields(delimiter = ?options.delimiter))]
pub fn detect<'a>(content: impl Into<Content<'a>>, options: &DetectOptions) -> Detection {
    let text = content.into().decode();
    let expected = options.delimiter;

    let lines = split_lines(&text);
    let line_count = lines.len();
    let header_count = count_delimiters(lines.first().copied()).count_of(expected);

    if let Some(required) = options.expected_delimiter_count.filter(|&n| n != 0)
        && header_count != required
    {
        return reject(Rejection::HeaderCountMismatch {
            expected: required,
            found: header_count,
        });
    }

    if header_count == 0 {
        return reject(Rejection::NoHeaderDelimiters);
    }

    let document_tally = count_delimiters(Some(&*text));
    let document_count = document_tally.count_of(expected);
    if document_count == 0 {
        return reject(Rejection::NoDelimiters);
    }

    if options.reject_competing
        && let Some((competitor, count)) = document_tally.dominant_competitor(expected)
    {
        return reject(Rejection::CompetingDelimiter {
            competitor,
            count,
            expected_count: document_count,
        });
    }

    if !validate_count(document_count, header_count, line_count) {
        return reject(Rejection::InconsistentCount {
            document_count,
            header_count,
            line_count,
        });
    }

    debug!(header_count, document_count, line_count, "delimiter confirmed");
    Detection::Detected {
        delimiter: expected,
    }
}

fn reject(reason: Rejection) -> Detection {
    debug!(%reason, "delimiter rejected");
    Detection::Rejected(reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn semi() -> DetectOptions {
        DetectOptions::new(';')
    }

    #[test]
    fn consistent_two_line_table() {
        assert_eq!(
            detect("a;b;c\n1;2;3", &semi()),
            Detection::Detected { delimiter: ';' }
        );
    }

    #[test]
    fn ragged_second_line_is_rejected() {
        let result = detect("a;b;c\n1;23", &semi());
        assert_eq!(result.delimiter(), None);
        assert_eq!(
            result.rejection(),
            Some(Rejection::InconsistentCount {
                document_count: 3,
                header_count: 2,
                line_count: 2,
            })
        );
    }

    #[test]
    fn other_delimiter_only() {
        assert_eq!(
            detect("a,b,c\n", &semi()),
            Detection::Rejected(Rejection::NoHeaderDelimiters)
        );
    }

    #[test]
    fn plain_text_is_rejected() {
        assert!(!detect("abcdef", &semi()).is_detected());
    }

    #[test]
    fn single_line_document() {
        assert_eq!(detect("a;b;c;d;e;f", &semi()).delimiter(), Some(';'));
    }

    #[test]
    fn mixed_delimiters_are_rejected() {
        assert!(!detect("a;b,c\nd,e,f", &semi()).is_detected());
    }

    #[test]
    fn unsupported_delimiter_never_matches() {
        let result = detect("a;b,c\nd,e,f", &DetectOptions::new(')'));
        assert_eq!(result, Detection::Rejected(Rejection::NoHeaderDelimiters));

        let parens = detect("a)b\nc)d", &DetectOptions::new(')'));
        assert!(!parens.is_detected());
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(
            detect("", &semi()),
            Detection::Rejected(Rejection::NoHeaderDelimiters)
        );
        assert!(!detect("\n\r\n  \n", &semi()).is_detected());
    }

    #[test]
    fn default_delimiter_is_semicolon() {
        assert_eq!(
            detect("x;y\n1;2", &DetectOptions::default()).delimiter(),
            Some(';')
        );
    }

    #[test]
    fn every_candidate_delimiter_can_be_confirmed() {
        for d in Delimiter::ALL {
            let c = d.as_char();
            let text = format!("a{c}b{c}c\n1{c}2{c}3\n4{c}5{c}6\n");
            assert_eq!(
                detect(text.as_str(), &DetectOptions::new(c)).delimiter(),
                Some(c),
                "delimiter {d}"
            );
        }
    }

    #[test]
    fn blank_lines_and_crlf_are_ignored() {
        let text = "a,b\r\n\r\n1,2\r\n   \r\n3,4\r\n";
        assert_eq!(detect(text, &DetectOptions::new(',')).delimiter(), Some(','));
    }

    #[test]
    fn quoted_delimiters_do_not_count() {
        let text = "name;note\n\"Smith; John\";ok\nDoe;\"a;b;c\"";
        assert_eq!(detect(text, &semi()).delimiter(), Some(';'));
    }

    #[test]
    fn quoted_field_may_span_lines() {
        // The quoted `;` is skipped, but the line split still sees three lines.
        let text = "id;body\n1;\"first;\nsecond\"\n";
        let result = detect(text, &semi());
        assert_eq!(
            result.rejection(),
            Some(Rejection::InconsistentCount {
                document_count: 2,
                header_count: 1,
                line_count: 3,
            })
        );
    }

    #[test]
    fn expected_count_must_match_header() {
        let opts = semi().with_expected_count(3);
        assert_eq!(
            detect("a;b;c\n1;2;3", &opts),
            Detection::Rejected(Rejection::HeaderCountMismatch {
                expected: 3,
                found: 2,
            })
        );

        let opts = semi().with_expected_count(2);
        assert!(detect("a;b;c\n1;2;3", &opts).is_detected());
    }

    #[test]
    fn zero_expected_count_means_unconstrained() {
        let opts = semi().with_expected_count(0);
        assert!(detect("a;b;c\n1;2;3", &opts).is_detected());
    }

    #[test]
    fn competing_delimiter_is_ignored_by_default() {
        // Commas dominate, but the semicolon layout is still consistent.
        let text = "a,b,c;d\ne,f,g;h";
        assert!(detect(text, &semi()).is_detected());
    }

    #[test]
    fn competing_delimiter_rejected_when_enabled() {
        let text = "a,b,c;d\ne,f,g;h";
        let opts = semi().with_reject_competing(true);
        assert_eq!(
            detect(text, &opts),
            Detection::Rejected(Rejection::CompetingDelimiter {
                competitor: Delimiter::Comma,
                count: 4,
                expected_count: 2,
            })
        );
    }

    #[test]
    fn bytes_are_decoded() {
        assert_eq!(detect(b"a|b\n1|2", &DetectOptions::new('|')).delimiter(), Some('|'));

        let mut bytes = b"a;b\n".to_vec();
        bytes.extend_from_slice(&[0xff, b';', b'z']);
        assert!(detect(&bytes, &semi()).is_detected());
    }

    #[test]
    fn detection_is_repeatable() {
        let text = "a;b\n1;2\n3;4";
        assert_eq!(detect(text, &semi()), detect(text, &semi()));
    }

    #[test]
    fn validate_count_requires_exact_multiple() {
        assert!(validate_count(6, 2, 3));
        assert!(!validate_count(7, 2, 3));
        assert!(!validate_count(6, 3, 3));
        assert!(!validate_count(4, 2, 3));
    }

    #[test]
    fn validate_count_guards_zero() {
        assert!(!validate_count(0, 0, 0));
        assert!(!validate_count(4, 0, 2));
        assert!(!validate_count(4, 2, 0));
    }

    #[test]
    fn detection_serializes_with_status_tag() {
        let json = serde_json::to_value(Detection::Detected { delimiter: ',' }).unwrap();
        assert_eq!(json["status"], "detected");
        assert_eq!(json["delimiter"], ",");

        let json =
            serde_json::to_value(Detection::Rejected(Rejection::NoHeaderDelimiters)).unwrap();
        assert_eq!(json["status"], "rejected");
        assert_eq!(json["reason"], "no_header_delimiters");
    }

    #[test]
    fn report_reflects_detection() {
        let report = DetectionReport::new(';', detect("a;b\n1;2", &semi()));
        assert!(report.detected);
        assert!(report.rejection.is_none());

        let report = DetectionReport::new(';', detect("ab", &semi()));
        assert!(!report.detected);
        assert_eq!(report.rejection, Some(Rejection::NoHeaderDelimiters));
    }
}
