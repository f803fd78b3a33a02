//! Filename suffix check.

use regex::Regex;
use std::sync::LazyLock;

/// At least one character (newlines included) followed by a literal `.csv`,
/// any case.
static CSV_FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^.+\.csv$").expect("valid regex"));

/// Whether `name` looks like a CSV file name (`report.csv`, `DATA.CSV`).
///
/// This only inspects the string. Directory components are allowed, so
/// `exports/2024.csv` passes too.
pub fn looks_like_csv_filename(name: &str) -> bool {
    CSV_FILENAME.is_match(name)
}
