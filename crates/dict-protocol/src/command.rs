//! DICT command types

use crate::error::ProtocolResult;
use bytes::{BufMut, BytesMut};
use dict_core::{validate_name, validate_word};
use std::fmt;

/// A command sent by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// SHOW DB
    ShowDatabases,

    /// SHOW STRATEGIES
    ShowStrategies,

    /// MATCH <database> <strategy> "<word>"
    Match {
        database: String,
        strategy: String,
        word: String,
    },

    /// DEFINE <database> "<word>"
    Define { database: String, word: String },

    /// QUIT
    Quit,
}

impl Command {
    pub fn show_databases() -> Self {
        Command::ShowDatabases
    }

    pub fn show_strategies() -> Self {
        Command::ShowStrategies
    }

    /// Build a MATCH command, rejecting arguments that would break the line
    pub fn match_word(
        database: impl Into<String>,
        strategy: impl Into<String>,
        word: impl Into<String>,
    ) -> ProtocolResult<Self> {
        let (database, strategy, word) = (database.into(), strategy.into(), word.into());
        validate_name("database", &database)?;
        validate_name("strategy", &strategy)?;
        validate_word(&word)?;

        Ok(Command::Match {
            database,
            strategy,
            word,
        })
    }

    /// Build a DEFINE command, rejecting arguments that would break the line
    pub fn define(database: impl Into<String>, word: impl Into<String>) -> ProtocolResult<Self> {
        let (database, word) = (database.into(), word.into());
        validate_name("database", &database)?;
        validate_word(&word)?;

        Ok(Command::Define { database, word })
    }

    pub fn quit() -> Self {
        Command::Quit
    }

    /// Short name used in errors and logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::ShowDatabases => "SHOW DB",
            Command::ShowStrategies => "SHOW STRATEGIES",
            Command::Match { .. } => "MATCH",
            Command::Define { .. } => "DEFINE",
            Command::Quit => "QUIT",
        }
    }

    /// Encode the command to bytes, CRLF included
    pub fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(64);
        self.encode_into(&mut buf);
        buf
    }

    /// Encode the command into an existing buffer
    pub fn encode_into(&self, buf: &mut BytesMut) {
        match self {
            Command::ShowDatabases | Command::ShowStrategies | Command::Quit => {
                buf.put_slice(self.name().as_bytes());
            }
            Command::Match {
                database,
                strategy,
                word,
            } => {
                buf.put_slice(b"MATCH ");
                buf.put_slice(database.as_bytes());
                buf.put_u8(b' ');
                buf.put_slice(strategy.as_bytes());
                put_quoted(buf, word);
            }
            Command::Define { database, word } => {
                buf.put_slice(b"DEFINE ");
                buf.put_slice(database.as_bytes());
                put_quoted(buf, word);
            }
        }
        buf.put_slice(b"\r\n");
    }
}

fn put_quoted(buf: &mut BytesMut, word: &str) {
    buf.put_slice(b" \"");
    buf.put_slice(word.as_bytes());
    buf.put_u8(b'"');
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = self.encode();
        let line = String::from_utf8_lossy(&encoded);
        f.write_str(line.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProtocolError;

    #[test]
    fn test_encode_show() {
        assert_eq!(Command::show_databases().encode().as_ref(), b"SHOW DB\r\n");
        assert_eq!(
            Command::show_strategies().encode().as_ref(),
            b"SHOW STRATEGIES\r\n"
        );
        assert_eq!(Command::quit().encode().as_ref(), b"QUIT\r\n");
    }

    #[test]
    fn test_encode_match() {
        let cmd = Command::match_word("*", "prefix", "hello world").unwrap();
        assert_eq!(
            cmd.encode().as_ref(),
            b"MATCH * prefix \"hello world\"\r\n"
        );
    }

    #[test]
    fn test_encode_define() {
        let cmd = Command::define("!", "cat").unwrap();
        assert_eq!(cmd.encode().as_ref(), b"DEFINE ! \"cat\"\r\n");
        assert_eq!(cmd.to_string(), "DEFINE ! \"cat\"");
    }

    #[test]
    fn test_rejects_line_breaking_arguments() {
        let err = Command::define("wn", "cat\r\nQUIT").unwrap_err();
        assert!(matches!(err, ProtocolError::Core(_)));

        assert!(Command::match_word("w n", ".", "cat").is_err());
        assert!(Command::match_word("wn", "pre\"fix", "cat").is_err());
        assert!(Command::define("wn", "").is_err());
    }
}
