//! Status lines and reply codes

use crate::command::Command;
use crate::error::{ProtocolError, ProtocolResult};
use std::fmt;
use std::str::FromStr;

/// A `<code> <text>` status line sent by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    code: u16,
    text: String,
}

impl StatusLine {
    /// Parse a status line.
    ///
    /// The line must start with exactly three digits in the range 100-599,
    /// followed by a space or the end of the line.
    pub fn parse(line: &str) -> ProtocolResult<Self> {
        let malformed = || ProtocolError::MalformedStatus(line.to_string());

        let bytes = line.as_bytes();
        if bytes.len() < 3 || !bytes[..3].iter().all(u8::is_ascii_digit) {
            return Err(malformed());
        }

        // Some servers send a bare code with no text
        let text = match bytes.get(3) {
            None => "",
            Some(b' ') => &line[4..],
            Some(_) => return Err(malformed()),
        };

        let code: u16 = line[..3].parse().map_err(|_| malformed())?;
        if !(100..=599).contains(&code) {
            return Err(malformed());
        }

        Ok(Self {
            code,
            text: text.to_string(),
        })
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    /// First digit of the code (1-5)
    pub fn class(&self) -> u8 {
        (self.code / 100) as u8
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Leading count in the text, e.g. `3` in `110 3 databases present`
    pub fn count(&self) -> Option<u64> {
        self.text.split_whitespace().next()?.parse().ok()
    }

    pub fn reply_code(&self) -> Option<ReplyCode> {
        ReplyCode::from_code(self.code)
    }
}

impl FromStr for StatusLine {
    type Err = ProtocolError;

    fn from_str(s: &str) -> ProtocolResult<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.text)
    }
}

/// Reply codes defined by RFC 2229
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplyCode {
    DatabasesPresent,
    StrategiesAvailable,
    DatabaseInformation,
    HelpText,
    ServerInformation,
    ChallengeFollows,
    DefinitionsRetrieved,
    DefinitionFollows,
    MatchesFound,
    StatusInformation,
    ConnectionEstablished,
    ClosingConnection,
    AuthenticationSuccessful,
    Ok,
    SendResponse,
    ServerTemporarilyUnavailable,
    ShuttingDown,
    SyntaxErrorCommand,
    SyntaxErrorParameters,
    CommandNotImplemented,
    ParameterNotImplemented,
    AccessDenied,
    AccessDeniedShowInfo,
    UnknownMechanism,
    InvalidDatabase,
    InvalidStrategy,
    NoMatch,
    NoDatabasesPresent,
    NoStrategiesAvailable,
}

impl ReplyCode {
    pub fn from_code(code: u16) -> Option<Self> {
        let reply = match code {
            110 => ReplyCode::DatabasesPresent,
            111 => ReplyCode::StrategiesAvailable,
            112 => ReplyCode::DatabaseInformation,
            113 => ReplyCode::HelpText,
            114 => ReplyCode::ServerInformation,
            130 => ReplyCode::ChallengeFollows,
            150 => ReplyCode::DefinitionsRetrieved,
            151 => ReplyCode::DefinitionFollows,
            152 => ReplyCode::MatchesFound,
            210 => ReplyCode::StatusInformation,
            220 => ReplyCode::ConnectionEstablished,
            221 => ReplyCode::ClosingConnection,
            230 => ReplyCode::AuthenticationSuccessful,
            250 => ReplyCode::Ok,
            330 => ReplyCode::SendResponse,
            420 => ReplyCode::ServerTemporarilyUnavailable,
            421 => ReplyCode::ShuttingDown,
            500 => ReplyCode::SyntaxErrorCommand,
            501 => ReplyCode::SyntaxErrorParameters,
            502 => ReplyCode::CommandNotImplemented,
            503 => ReplyCode::ParameterNotImplemented,
            530 => ReplyCode::AccessDenied,
            531 => ReplyCode::AccessDeniedShowInfo,
            532 => ReplyCode::UnknownMechanism,
            550 => ReplyCode::InvalidDatabase,
            551 => ReplyCode::InvalidStrategy,
            552 => ReplyCode::NoMatch,
            554 => ReplyCode::NoDatabasesPresent,
            555 => ReplyCode::NoStrategiesAvailable,
            _ => return None,
        };
        Some(reply)
    }

    pub fn code(self) -> u16 {
        match self {
            ReplyCode::DatabasesPresent => 110,
            ReplyCode::StrategiesAvailable => 111,
            ReplyCode::DatabaseInformation => 112,
            ReplyCode::HelpText => 113,
            ReplyCode::ServerInformation => 114,
            ReplyCode::ChallengeFollows => 130,
            ReplyCode::DefinitionsRetrieved => 150,
            ReplyCode::DefinitionFollows => 151,
            ReplyCode::MatchesFound => 152,
            ReplyCode::StatusInformation => 210,
            ReplyCode::ConnectionEstablished => 220,
            ReplyCode::ClosingConnection => 221,
            ReplyCode::AuthenticationSuccessful => 230,
            ReplyCode::Ok => 250,
            ReplyCode::SendResponse => 330,
            ReplyCode::ServerTemporarilyUnavailable => 420,
            ReplyCode::ShuttingDown => 421,
            ReplyCode::SyntaxErrorCommand => 500,
            ReplyCode::SyntaxErrorParameters => 501,
            ReplyCode::CommandNotImplemented => 502,
            ReplyCode::ParameterNotImplemented => 503,
            ReplyCode::AccessDenied => 530,
            ReplyCode::AccessDeniedShowInfo => 531,
            ReplyCode::UnknownMechanism => 532,
            ReplyCode::InvalidDatabase => 550,
            ReplyCode::InvalidStrategy => 551,
            ReplyCode::NoMatch => 552,
            ReplyCode::NoDatabasesPresent => 554,
            ReplyCode::NoStrategiesAvailable => 555,
        }
    }
}

/// What the engine does after reading the first status line of a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// A multi-line body follows and carries the result
    Body,
    /// A multi-line body follows but the result is empty; read and drop it
    Drain,
    /// Nothing follows; the result is empty
    Empty,
    /// Nothing follows; the server refused the command
    Rejected(ReplyCode),
}

/// Decide how to continue an exchange for `command` given its first status.
///
/// Any code not listed for the command is a protocol violation.
pub fn disposition(command: &Command, status: &StatusLine) -> ProtocolResult<Disposition> {
    let unexpected = || ProtocolError::UnexpectedStatus {
        command: command.name(),
        code: status.code(),
        text: status.text().to_string(),
    };

    let reply = status.reply_code().ok_or_else(unexpected)?;

    let disposition = match (command, reply) {
        (Command::ShowDatabases, ReplyCode::DatabasesPresent) => Disposition::Body,
        (Command::ShowDatabases, ReplyCode::NoDatabasesPresent) => Disposition::Empty,

        (Command::ShowStrategies, ReplyCode::StrategiesAvailable) if status.count() == Some(0) => {
            Disposition::Drain
        }
        (Command::ShowStrategies, ReplyCode::StrategiesAvailable) => Disposition::Body,
        (
            Command::ShowStrategies,
            ReplyCode::NoStrategiesAvailable | ReplyCode::SyntaxErrorParameters,
        ) => Disposition::Empty,

        (Command::Match { .. }, ReplyCode::MatchesFound) => Disposition::Body,
        (Command::Match { .. }, ReplyCode::NoMatch) => Disposition::Empty,
        (Command::Match { .. }, ReplyCode::InvalidDatabase | ReplyCode::InvalidStrategy) => {
            Disposition::Rejected(reply)
        }

        (Command::Define { .. }, ReplyCode::DefinitionsRetrieved) => Disposition::Body,
        (Command::Define { .. }, ReplyCode::NoMatch) => Disposition::Empty,
        (Command::Define { .. }, ReplyCode::InvalidDatabase) => Disposition::Rejected(reply),

        (Command::Quit, ReplyCode::ClosingConnection) => Disposition::Empty,

        _ => return Err(unexpected()),
    };

    Ok(disposition)
}
