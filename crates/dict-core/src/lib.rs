//! DICT Core - domain types shared by the protocol and client crates
//!
//! This crate provides:
//! - Dictionary entities returned by a server (databases, strategies,
//!   matches, definitions)
//! - Validation for the tokens and words that end up on the wire
//! - The pseudo-database and default-strategy names defined by RFC 2229

pub mod error;
pub mod model;

pub use error::{Error, Result};
pub use model::{
    validate_name, validate_word, Database, Definition, Match, MatchingStrategy, ALL_DATABASES,
    DEFAULT_STRATEGY, FIRST_MATCH,
};
