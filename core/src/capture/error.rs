//! Error types for capture parsing

use thiserror::Error;

/// Errors while parsing a capture blob
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no snapshot identifier at line {line_number}: {value}")]
    InvalidIdentifier { line_number: u64, value: String },

    #[error("invalid timestamp at line {line_number}: {segment}")]
    InvalidTimestamp { line_number: u64, segment: String },
}
