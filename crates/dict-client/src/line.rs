//! Line source over a buffered byte stream

use crate::error::{ClientError, ClientResult};
use dict_protocol::ProtocolError;
use std::io::{self, BufRead, Read};

/// Longest line accepted from the server, terminator excluded
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Reads LF (or CRLF) terminated lines, one at a time.
///
/// Bytes already buffered past the current line stay in the wrapped reader
/// for the next call.
pub struct LineReader<R> {
    inner: R,
    buf: Vec<u8>,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::with_capacity(1024),
        }
    }

    /// Read the next line without its terminator.
    ///
    /// Returns `Ok(None)` on a clean end of stream. A stream that ends in
    /// the middle of a line is a transport error.
    pub fn read_line(&mut self) -> ClientResult<Option<String>> {
        self.buf.clear();

        // Room for the longest line plus CRLF
        let limit = MAX_LINE_LENGTH as u64 + 2;
        let n = (&mut self.inner).take(limit).read_until(b'\n', &mut self.buf)?;

        if n == 0 {
            return Ok(None);
        }

        if self.buf.last() != Some(&b'\n') {
            if n as u64 >= limit {
                return Err(too_long(n));
            }
            return Err(ClientError::Transport(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed in the middle of a line",
            )));
        }

        self.buf.pop();
        if self.buf.last() == Some(&b'\r') {
            self.buf.pop();
        }

        if self.buf.len() > MAX_LINE_LENGTH {
            return Err(too_long(self.buf.len()));
        }

        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }
}

fn too_long(size: usize) -> ClientError {
    ProtocolError::LineTooLong {
        size,
        max: MAX_LINE_LENGTH,
    }
    .into()
}
