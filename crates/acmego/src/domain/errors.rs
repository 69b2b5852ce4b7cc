//! Domain-specific errors.

use thiserror::Error;

/// Failures while translating between character and byte positions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OffsetError {
    #[error("invalid UTF-8 sequence at byte {offset}")]
    InvalidEncoding { offset: usize },
    #[error("position {index} is past the end of the buffer ({available} available)")]
    OutOfRange { index: usize, available: usize },
}

/// Errors raised by command handlers before any tool runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The caller got the command line wrong; the payload is the usage text.
    #[error("{0}")]
    Usage(String),
    #[error("unknown command '{name}'\n\n{usage}")]
    Unknown { name: String, usage: String },
}
