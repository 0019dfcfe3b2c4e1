//! DICT Client
//!
//! Blocking client for RFC 2229 dictionary servers:
//! - Line source over any buffered reader
//! - Response engine serialising exchanges on one stream
//! - TCP connect with the greeting handshake
//! - TOML configuration

pub mod client;
pub mod config;
pub mod connect;
pub mod error;
pub mod line;

pub use client::DictClient;
pub use config::ClientConfig;
pub use connect::{connect, connect_with, handshake, TcpDictClient, DEFAULT_PORT};
pub use error::{ClientError, ClientResult};
pub use line::{LineReader, MAX_LINE_LENGTH};

pub use dict_core::{Database, Definition, Match, MatchingStrategy};
