//! Error types for DICT Core

use thiserror::Error;

/// Core error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid {kind} name: {reason}")]
    InvalidName { kind: &'static str, reason: String },

    #[error("Invalid word: {0}")]
    InvalidWord(String),
}

/// Result type alias for DICT Core operations
pub type Result<T> = std::result::Result<T, Error>;
