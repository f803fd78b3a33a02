//! Error types for dsv-sniff-core.
//!
//! Detection itself never fails: a document that isn't a consistent table is
//! reported through [`Detection::Rejected`](crate::Detection::Rejected).

use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;
