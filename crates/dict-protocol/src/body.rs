//! Multi-line body framing
//!
//! A text body is a run of lines closed by a line holding a single `.`.
//! Lines that start with a dot are sent with the dot doubled, so the
//! terminator can never appear inside the text.

use std::borrow::Cow;

use crate::error::{ProtocolError, ProtocolResult};

/// Line that closes a multi-line body
pub const TERMINATOR: &str = ".";

/// Undo dot-stuffing on one body line
pub fn unstuff(line: &str) -> &str {
    if line.starts_with("..") {
        &line[1..]
    } else {
        line
    }
}

/// Dot-stuff one body line, the inverse of [`unstuff`]
pub fn stuff(line: &str) -> Cow<'_, str> {
    if line.starts_with('.') {
        Cow::Owned(format!(".{line}"))
    } else {
        Cow::Borrowed(line)
    }
}

/// Result of feeding one line to a [`BodyCollector`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyProgress {
    /// The body continues
    More,
    /// The terminator was seen
    Complete,
}

/// Accumulates the lines of one multi-line body
#[derive(Debug, Default)]
pub struct BodyCollector {
    lines: Vec<String>,
    complete: bool,
}

impl BodyCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next raw line read from the server.
    ///
    /// Lines pushed after the terminator are ignored.
    pub fn push(&mut self, line: &str) -> BodyProgress {
        if self.complete {
            return BodyProgress::Complete;
        }

        if line == TERMINATOR {
            self.complete = true;
            return BodyProgress::Complete;
        }

        self.lines.push(unstuff(line).to_string());
        BodyProgress::More
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Hand over the unescaped lines; fails if the terminator never came
    pub fn finish(self) -> ProtocolResult<Vec<String>> {
        if !self.complete {
            return Err(ProtocolError::TruncatedBody("end of text body"));
        }
        Ok(self.lines)
    }
}
