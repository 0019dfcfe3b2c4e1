//! Dictionary entities

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Pseudo-database: search every database on the server
pub const ALL_DATABASES: &str = "*";

/// Pseudo-database: stop at the first database that has a result
pub const FIRST_MATCH: &str = "!";

/// Strategy name that selects the server's default matching strategy
pub const DEFAULT_STRATEGY: &str = ".";

/// Maximum length of a database or strategy name
const MAX_NAME_LEN: usize = 512;

/// Validate a protocol token (database or strategy name).
///
/// Tokens travel unquoted in `MATCH` and `DEFINE`, so they may not contain
/// whitespace, quotes or control characters.
pub fn validate_name(kind: &'static str, name: &str) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidName {
        kind,
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("name cannot be empty"));
    }

    if name.len() > MAX_NAME_LEN {
        return Err(invalid("name exceeds 512 bytes"));
    }

    if name
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || c == '"' || c == '\'')
    {
        return Err(invalid(
            "name must not contain whitespace, quotes or control characters",
        ));
    }

    Ok(())
}

/// Validate a word sent inside double quotes.
pub fn validate_word(word: &str) -> Result<()> {
    if word.is_empty() {
        return Err(Error::InvalidWord("word cannot be empty".into()));
    }

    if word.contains(['"', '\r', '\n']) {
        return Err(Error::InvalidWord(format!(
            "{word:?} contains a quote or line break"
        )));
    }

    Ok(())
}

/// A database served by a DICT server
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Database {
    name: String,
    description: String,
}

impl Database {
    /// Create a database entry, validating the name
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_name("database", &name)?;

        Ok(Self {
            name,
            description: description.into(),
        })
    }

    /// The `*` pseudo-database
    pub fn all() -> Self {
        Self {
            name: ALL_DATABASES.to_string(),
            description: "All databases".to_string(),
        }
    }

    /// The `!` pseudo-database
    pub fn first_match() -> Self {
        Self {
            name: FIRST_MATCH.to_string(),
            description: "First database with a match".to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether this names a pseudo-database rather than a real one
    pub fn is_pseudo(&self) -> bool {
        self.name == ALL_DATABASES || self.name == FIRST_MATCH
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \"{}\"", self.name, self.description)
    }
}

/// A matching strategy supported by a DICT server.
///
/// Strategies are referenced by name on the wire, so equality and hashing
/// only look at the name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingStrategy {
    name: String,
    description: String,
}

impl MatchingStrategy {
    /// Create a strategy entry, validating the name
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_name("strategy", &name)?;

        Ok(Self {
            name,
            description: description.into(),
        })
    }

    /// The `.` strategy, which lets the server pick
    pub fn server_default() -> Self {
        Self {
            name: DEFAULT_STRATEGY.to_string(),
            description: "Server default".to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl PartialEq for MatchingStrategy {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for MatchingStrategy {}

impl Hash for MatchingStrategy {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for MatchingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \"{}\"", self.name, self.description)
    }
}

/// A word matched in a database
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Match {
    database: String,
    word: String,
}

impl Match {
    pub fn new(database: impl Into<String>, word: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            word: word.into(),
        }
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn word(&self) -> &str {
        &self.word
    }
}

/// A definition of a word taken from one database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    word: String,
    database_name: String,
    body: String,
}

impl Definition {
    pub fn new(
        word: impl Into<String>,
        database_name: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            word: word.into(),
            database_name: database_name.into(),
            body: body.into(),
        }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// Definition text, lines separated by `\n`
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.body.lines()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_database_name_validation() {
        assert!(Database::new("wn", "WordNet").is_ok());
        assert!(Database::new("", "empty").is_err());
        assert!(Database::new("two words", "x").is_err());
        assert!(Database::new("quo\"te", "x").is_err());
        assert!(Database::new("tab\there", "x").is_err());
    }

    #[test]
    fn test_pseudo_databases() {
        assert_eq!(Database::all().name(), "*");
        assert_eq!(Database::first_match().name(), "!");
        assert!(Database::all().is_pseudo());
        assert!(!Database::new("gcide", "GCIDE").unwrap().is_pseudo());
    }

    #[test]
    fn test_strategy_identity_is_name() {
        let a = MatchingStrategy::new("prefix", "Match prefixes").unwrap();
        let b = MatchingStrategy::new("prefix", "Something else").unwrap();
        assert_eq!(a, b);

        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_word_validation() {
        assert!(validate_word("hello world").is_ok());
        assert!(validate_word("").is_err());
        assert!(validate_word("say \"hi\"").is_err());
        assert!(validate_word("line\r\nbreak").is_err());
    }

    #[test]
    fn test_display_is_wire_shape() {
        let db = Database::new("able", "a way of doing").unwrap();
        assert_eq!(db.to_string(), "able \"a way of doing\"");
    }

    #[test]
    fn test_definition_serializes() {
        let def = Definition::new("cat", "wn", "n 1: feline mammal");
        let json = serde_json::to_value(&def).unwrap();
        assert_eq!(json["database_name"], "wn");
        assert_eq!(json["body"], "n 1: feline mammal");
    }
}
