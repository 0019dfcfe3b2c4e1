//! Client error types

use dict_protocol::ProtocolError;
use std::io;
use thiserror::Error;

/// Errors raised by the client
#[derive(Error, Debug)]
pub enum ClientError {
    /// I/O failure or the stream went away; the connection is unusable
    #[error("Transport error: {0}")]
    Transport(#[from] io::Error),

    /// The server broke the protocol; the connection is unusable
    #[error("Protocol violation: {0}")]
    Protocol(#[from] ProtocolError),

    /// The server refused the command; the connection stays usable
    #[error("Command rejected: {code} {text}")]
    CommandRejected { code: u16, text: String },

    /// The greeting handshake failed
    #[error("Connection refused: {0}")]
    ConnectionRefused(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    pub(crate) fn not_connected() -> Self {
        ClientError::Transport(io::Error::new(
            io::ErrorKind::NotConnected,
            "connection is closed",
        ))
    }

    /// Whether the connection must be abandoned after this error
    pub fn is_fatal(&self) -> bool {
        match self {
            ClientError::Transport(_) => true,
            ClientError::Protocol(ProtocolError::Core(_)) => false,
            ClientError::Protocol(_) => true,
            ClientError::CommandRejected { .. }
            | ClientError::ConnectionRefused(_)
            | ClientError::Config(_) => false,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
