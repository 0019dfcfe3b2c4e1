//! Response engine - runs one command/reply exchange at a time over a stream

use std::io::{BufRead, Write};

use dict_core::{Database, Definition, Match, MatchingStrategy};
use dict_protocol::{
    decode_databases, decode_definitions, decode_matches, decode_strategies, disposition, stuff,
    BodyCollector, BodyProgress, Command, Disposition, ProtocolError, ProtocolResult, ReplyCode,
    StatusLine, TERMINATOR,
};
use parking_lot::Mutex;
use tracing::{debug, info, trace, warn};

use crate::error::{ClientError, ClientResult};
use crate::line::LineReader;

/// A DICT client bound to one open stream.
///
/// Every operation holds the stream lock from writing its command until the
/// reply is fully consumed, so exchanges never interleave. Operations block
/// without timeout; shutting the underlying stream down from elsewhere (see
/// [`TcpDictClient::shutdown`](crate::TcpDictClient::shutdown)) unblocks them
/// with a transport error.
pub struct DictClient<R, W> {
    channel: Mutex<Option<Channel<R, W>>>,
    greeting: Option<StatusLine>,
}

/// Reader and writer halves of the stream
struct Channel<R, W> {
    reader: LineReader<R>,
    writer: W,
}

impl<R: BufRead, W: Write> DictClient<R, W> {
    /// Wrap a stream whose greeting has already been consumed
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            channel: Mutex::new(Some(Channel {
                reader: LineReader::new(reader),
                writer,
            })),
            greeting: None,
        }
    }

    pub(crate) fn with_greeting(reader: LineReader<R>, writer: W, greeting: StatusLine) -> Self {
        Self {
            channel: Mutex::new(Some(Channel { reader, writer })),
            greeting: Some(greeting),
        }
    }

    /// Banner sent by the server on connect, if the handshake ran here
    pub fn greeting(&self) -> Option<&StatusLine> {
        self.greeting.as_ref()
    }

    /// False once the client was closed or hit a fatal error
    pub fn is_open(&self) -> bool {
        self.channel.lock().is_some()
    }

    /// List the databases served (`SHOW DB`)
    pub fn list_databases(&self) -> ClientResult<Vec<Database>> {
        self.execute(Command::show_databases(), decode_databases)
    }

    /// List the matching strategies supported (`SHOW STRATEGIES`)
    pub fn list_strategies(&self) -> ClientResult<Vec<MatchingStrategy>> {
        self.execute(Command::show_strategies(), decode_strategies)
    }

    /// Find words matching `word` under `strategy` (`MATCH`).
    ///
    /// `database` may be a pseudo-database such as [`Database::all`].
    pub fn match_word(
        &self,
        word: &str,
        strategy: &MatchingStrategy,
        database: &Database,
    ) -> ClientResult<Vec<Match>> {
        let command = Command::match_word(database.name(), strategy.name(), word)?;
        self.execute(command, decode_matches)
    }

    /// Fetch every definition of `word` (`DEFINE`).
    ///
    /// With a pseudo-database the server may answer from several databases.
    pub fn define(&self, word: &str, database: &Database) -> ClientResult<Vec<Definition>> {
        let command = Command::define(database.name(), word)?;
        self.execute(command, decode_definitions)
    }

    /// Send `QUIT` and drop the stream. Errors are ignored.
    pub fn close(&self) {
        let mut guard = self.channel.lock();
        if let Some(mut channel) = guard.take() {
            match channel.quit() {
                Ok(()) => info!("Connection closed"),
                Err(e) => debug!(error = %e, "Ignoring error while closing connection"),
            }
        }
    }

    /// Run one exchange under the lock and decode its body.
    ///
    /// The stream is dropped after a fatal error so later calls fail fast.
    fn execute<T: Default>(
        &self,
        command: Command,
        decode: impl FnOnce(&[String]) -> ProtocolResult<T>,
    ) -> ClientResult<T> {
        let mut guard = self.channel.lock();
        let channel = guard.as_mut().ok_or_else(ClientError::not_connected)?;

        let result = channel.exchange(&command).and_then(|body| match body {
            Some(lines) => Ok(decode(&lines)?),
            None => Ok(T::default()),
        });

        if let Err(e) = &result {
            if e.is_fatal() {
                warn!(command = command.name(), error = %e, "Dropping connection");
                *guard = None;
            }
        }

        result
    }
}

impl<R: BufRead, W: Write> Channel<R, W> {
    /// Send `command` and read its reply.
    ///
    /// Returns the raw body lines, or `None` when the reply carries no result.
    fn exchange(&mut self, command: &Command) -> ClientResult<Option<Vec<String>>> {
        self.send(command)?;

        let status = self.read_status()?;
        debug!(command = command.name(), code = status.code(), text = status.text(), "Received status");

        match disposition(command, &status)? {
            Disposition::Body => {
                let lines = match command {
                    Command::Define { .. } => self.read_definitions()?,
                    _ => {
                        let lines = self.read_body()?;
                        self.read_summary()?;
                        lines
                    }
                };
                Ok(Some(lines))
            }
            Disposition::Drain => {
                self.read_body()?;
                self.read_summary()?;
                Ok(None)
            }
            Disposition::Empty => Ok(None),
            Disposition::Rejected(_) => Err(ClientError::CommandRejected {
                code: status.code(),
                text: status.text().to_string(),
            }),
        }
    }

    fn send(&mut self, command: &Command) -> ClientResult<()> {
        self.writer.write_all(&command.encode())?;
        self.writer.flush()?;
        debug!(command = %command, "Sent command");
        Ok(())
    }

    fn read_status(&mut self) -> ClientResult<StatusLine> {
        match self.reader.read_line()? {
            Some(line) => Ok(StatusLine::parse(&line)?),
            None => Err(ProtocolError::TruncatedBody("status line").into()),
        }
    }

    /// Read one dot-terminated text body
    fn read_body(&mut self) -> ClientResult<Vec<String>> {
        let mut body = BodyCollector::new();
        while let Some(line) = self.reader.read_line()? {
            if body.push(&line) == BodyProgress::Complete {
                break;
            }
        }

        trace!(lines = body.len(), complete = body.is_complete(), "Read body");
        Ok(body.finish()?)
    }

    /// Consume the status that closes a reply after its body
    fn read_summary(&mut self) -> ClientResult<StatusLine> {
        let summary = self.read_status()?;
        trace!(code = summary.code(), "Read summary");
        Ok(summary)
    }

    /// Read the 151 blocks that follow a 150 status up to the summary.
    ///
    /// Each block lands in the buffer as its header, its text dot-stuffed
    /// again and a `.` delimiter.
    fn read_definitions(&mut self) -> ClientResult<Vec<String>> {
        let mut lines = Vec::new();

        loop {
            let status = self.read_status()?;
            if status.reply_code() == Some(ReplyCode::DefinitionFollows) {
                lines.push(format!("{} {}", status.code(), status.text()));
                lines.extend(self.read_body()?.iter().map(|line| stuff(line).into_owned()));
                lines.push(TERMINATOR.to_string());
            } else if status.class() == 2 {
                trace!(code = status.code(), "Read summary");
                return Ok(lines);
            } else {
                return Err(ProtocolError::UnexpectedStatus {
                    command: "DEFINE",
                    code: status.code(),
                    text: status.text().to_string(),
                }
                .into());
            }
        }
    }

    fn quit(&mut self) -> ClientResult<()> {
        let command = Command::quit();
        self.send(&command)?;

        let status = self.read_status()?;
        disposition(&command, &status)?;
        debug!(text = status.text(), "Server acknowledged QUIT");
        Ok(())
    }
}
