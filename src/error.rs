//! Error types for puzzle input parsing

use std::num::ParseIntError;

use thiserror::Error;

/// Error type for parsing and interpreting puzzle input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A delimiter the line format requires is absent
    #[error("Missing separator {separator:?} in line {line:?}")]
    MissingSeparator { line: String, separator: String },
    /// A token that should be an integer isn't one
    #[error("Invalid number {token:?}: {source}")]
    InvalidNumber {
        token: String,
        #[source]
        source: ParseIntError,
    },
    /// Input doesn't match the expected structure
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    /// Required data is missing from input
    #[error("Missing data: {0}")]
    MissingData(String),
}
