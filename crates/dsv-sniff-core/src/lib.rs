//! Core library for dsv-sniff.
//!
//! Confirms whether a block of text is a delimiter-separated table using one
//! expected delimiter. No schema and no column names are needed: every
//! non-blank line must carry the same number of unquoted delimiters as the
//! header line.
//!
//! # Modules
//!
//! - [`detect`] - The detection operation and its result types
//! - [`delimiter`] - Candidate delimiters and quote-aware counting
//! - [`lines`] - Line splitting
//! - [`filename`] - `.csv` filename check
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```
//! use dsv_sniff_core::{DetectOptions, detect, looks_like_csv_filename};
//!
//! let detection = detect("id,name\n1,ada\n2,grace\n", &DetectOptions::new(','));
//! assert_eq!(detection.delimiter(), Some(','));
//!
//! assert!(looks_like_csv_filename("people.CSV"));
//! ```
#![deny(unsafe_code)]

pub mod config;
pub mod delimiter;
pub mod detect;
pub mod error;
pub mod filename;
pub mod lines;

pub use config::{Config, ConfigLoader, ConfigSources, LogLevel};
pub use delimiter::{Delimiter, DelimiterTally, count_delimiters, parse_delimiter};
pub use detect::{
    Content, DEFAULT_DELIMITER, DetectOptions, Detection, DetectionReport, Rejection, detect,
    validate_count,
};
pub use error::{ConfigError, ConfigResult};
pub use filename::looks_like_csv_filename;
pub use lines::split_lines;

/// Default maximum input size in bytes (5 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;
