//! DICT protocol (RFC 2229)
//!
//! A line-based request/response protocol for querying dictionary servers.
//! This crate does no I/O: it encodes commands, classifies status lines,
//! frames multi-line bodies and decodes them into `dict_core` entities.
//!
//! ## Command Format
//! ```text
//! SHOW DB
//! SHOW STRATEGIES
//! MATCH <database> <strategy> "<word>"
//! DEFINE <database> "<word>"
//! QUIT
//! ```
//!
//! ## Reply Format
//! ```text
//! <code> <text>            # Status line
//! <line>                   # Optional text body, dot-stuffed
//! .                        # Body terminator
//! 250 ok                   # Summary status after a body
//! ```

pub mod body;
pub mod command;
pub mod decode;
pub mod error;
pub mod status;

pub use body::{stuff, unstuff, BodyCollector, BodyProgress, TERMINATOR};
pub use command::Command;
pub use decode::{decode_databases, decode_definitions, decode_matches, decode_strategies};
pub use error::{ProtocolError, ProtocolResult};
pub use status::{disposition, Disposition, ReplyCode, StatusLine};
