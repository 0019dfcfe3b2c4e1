//! Protocol error types

use thiserror::Error;

/// Protocol-specific errors.
///
/// Every variant except `Core` means the server sent something outside the
/// protocol and the exchange cannot continue. `Core` is raised while building
/// a command, before anything is written.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Malformed status line: {0:?}")]
    MalformedStatus(String),

    #[error("Unexpected status {code} in reply to {command}: {text}")]
    UnexpectedStatus {
        command: &'static str,
        code: u16,
        text: String,
    },

    #[error("Malformed {kind} line: {line:?}")]
    MalformedLine { kind: &'static str, line: String },

    #[error("Connection closed before {0}")]
    TruncatedBody(&'static str),

    #[error("Line too long: {size} > {max}")]
    LineTooLong { size: usize, max: usize },

    #[error("Core error: {0}")]
    Core(#[from] dict_core::Error),
}

/// Result type for protocol operations
pub type ProtocolResult<T> = Result<T, ProtocolError>;
