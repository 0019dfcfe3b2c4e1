//! Decoders from raw body lines to dictionary entities

use crate::body::{unstuff, TERMINATOR};
use crate::error::{ProtocolError, ProtocolResult};
use crate::status::{ReplyCode, StatusLine};
use dict_core::{Database, Definition, Match, MatchingStrategy};
use std::collections::HashSet;
use tracing::trace;

/// Split a `<name> "<quoted text>"` line into its two parts.
///
/// The name ends at the first space or tab; the remainder must be wrapped
/// in double quotes, which are stripped.
pub fn split_entry<'a>(kind: &'static str, line: &'a str) -> ProtocolResult<(&'a str, &'a str)> {
    let malformed = || ProtocolError::MalformedLine {
        kind,
        line: line.to_string(),
    };

    let split = line.find([' ', '\t']).ok_or_else(malformed)?;
    let (name, rest) = line.split_at(split);
    let rest = rest.trim();

    if name.is_empty() || rest.len() < 2 || !rest.starts_with('"') || !rest.ends_with('"') {
        return Err(malformed());
    }

    Ok((name, &rest[1..rest.len() - 1]))
}

/// Decode a `SHOW DB` body
pub fn decode_databases(lines: &[String]) -> ProtocolResult<Vec<Database>> {
    lines
        .iter()
        .map(|line| {
            let (name, description) = split_entry("database", line)?;
            Database::new(name, description).map_err(|_| ProtocolError::MalformedLine {
                kind: "database",
                line: line.clone(),
            })
        })
        .collect()
}

/// Decode a `SHOW STRATEGIES` body; a repeated name keeps its first entry
pub fn decode_strategies(lines: &[String]) -> ProtocolResult<Vec<MatchingStrategy>> {
    let mut seen = HashSet::new();
    let mut strategies = Vec::with_capacity(lines.len());

    for line in lines {
        let (name, description) = split_entry("strategy", line)?;
        let strategy =
            MatchingStrategy::new(name, description).map_err(|_| ProtocolError::MalformedLine {
                kind: "strategy",
                line: line.clone(),
            })?;

        if seen.insert(strategy.clone()) {
            strategies.push(strategy);
        }
    }

    Ok(strategies)
}

/// Decode a `MATCH` body.
///
/// Server order is kept. A word already matched in an earlier line is
/// dropped, whichever database the later line names.
pub fn decode_matches(lines: &[String]) -> ProtocolResult<Vec<Match>> {
    let mut seen = HashSet::new();
    let mut matches = Vec::with_capacity(lines.len());

    for line in lines {
        let (database, word) = split_entry("match", line)?;
        if seen.insert(word) {
            matches.push(Match::new(database, word));
        }
    }

    trace!(lines = lines.len(), matches = matches.len(), "Decoded matches");
    Ok(matches)
}

/// Parse a `151 "<word>" <database> [text]` header.
///
/// Returns `None` when the line is not a 151 status at all. The database
/// may be bare or quoted.
pub fn parse_definition_header(line: &str) -> ProtocolResult<Option<(String, String)>> {
    let status = match StatusLine::parse(line) {
        Ok(status) if status.reply_code() == Some(ReplyCode::DefinitionFollows) => status,
        _ => return Ok(None),
    };

    let malformed = || ProtocolError::MalformedLine {
        kind: "definition header",
        line: line.to_string(),
    };

    let mut tokens = Tokenizer::new(status.text());
    let word = tokens.next().ok_or_else(malformed)?;
    let database = tokens.next().ok_or_else(malformed)?;

    Ok(Some((word.to_string(), database.to_string())))
}

/// Decode the raw buffer of a `DEFINE` reply.
///
/// The buffer holds, per definition, a 151 header, the dot-stuffed text
/// lines and one `.` delimiter line. A bare `.` therefore always closes the
/// current definition. Lines outside a definition are ignored.
pub fn decode_definitions(lines: &[String]) -> ProtocolResult<Vec<Definition>> {
    let mut definitions = Vec::new();
    let mut current: Option<PendingDefinition<'_>> = None;

    for line in lines {
        match current.take() {
            None => {
                if let Some((word, database)) = parse_definition_header(line)? {
                    current = Some(PendingDefinition {
                        word,
                        database,
                        text: Vec::new(),
                    });
                } else {
                    trace!(line = %line, "Skipping line outside a definition");
                }
            }
            Some(pending) if line == TERMINATOR => definitions.push(pending.finish()),
            Some(mut pending) => {
                pending.text.push(unstuff(line));
                current = Some(pending);
            }
        }
    }

    if current.is_some() {
        return Err(ProtocolError::TruncatedBody("end of definition"));
    }

    trace!(definitions = definitions.len(), "Decoded definitions");
    Ok(definitions)
}

struct PendingDefinition<'a> {
    word: String,
    database: String,
    text: Vec<&'a str>,
}

impl PendingDefinition<'_> {
    fn finish(self) -> Definition {
        Definition::new(self.word, self.database, self.text.join("\n"))
    }
}

/// Splits status text into tokens, honouring double-quoted strings
struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn next(&mut self) -> Option<&'a str> {
        // Skip whitespace
        while self.pos < self.input.len()
            && self.input[self.pos..].starts_with([' ', '\t'])
        {
            self.pos += 1;
        }

        if self.pos >= self.input.len() {
            return None;
        }

        let remaining = &self.input[self.pos..];

        if let Some(quoted) = remaining.strip_prefix('"') {
            if let Some(end) = quoted.find('"') {
                self.pos += end + 2;
                return Some(&quoted[..end]);
            }
        }

        let end = remaining.find([' ', '\t']).unwrap_or(remaining.len());
        self.pos += end;

        Some(&remaining[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_decode_database_with_tab() {
        let dbs = decode_databases(&lines(&["able\t\"a way of doing\""])).unwrap();
        assert_eq!(dbs, vec![Database::new("able", "a way of doing").unwrap()]);
    }

    #[test]
    fn test_entry_roundtrip() {
        let cases = [
            ("wn", "WordNet (r) 3.0 (2006)"),
            ("gcide", "The Collaborative International Dictionary of English v.0.48"),
            ("foldoc", ""),
            ("jargon", "say \"hi\""),
        ];

        for (name, description) in cases {
            let line = format!("{name} \"{description}\"");
            let db = &decode_databases(&[line.clone()]).unwrap()[0];
            assert_eq!(db.name(), name);
            assert_eq!(db.description(), description);
            assert_eq!(db.to_string(), line);
        }
    }

    #[test]
    fn test_malformed_entries() {
        for raw in ["noquote", "wn WordNet", "wn \"unterminated", " \"no name\"", "wn \""] {
            assert!(
                matches!(
                    decode_databases(&lines(&[raw])),
                    Err(ProtocolError::MalformedLine { .. })
                ),
                "accepted {raw:?}"
            );
        }
    }

    #[test]
    fn test_decode_strategies_dedupes_by_name() {
        let strategies = decode_strategies(&lines(&[
            "exact \"Match headwords exactly\"",
            "prefix \"Match prefixes\"",
            "exact \"Duplicate entry\"",
        ]))
        .unwrap();

        assert_eq!(strategies.len(), 2);
        assert_eq!(strategies[0].name(), "exact");
        assert_eq!(strategies[0].description(), "Match headwords exactly");
        assert_eq!(strategies[1].name(), "prefix");
    }

    #[test]
    fn test_decode_matches_keeps_order_and_drops_repeats() {
        let matches = decode_matches(&lines(&[
            "wn \"cat\"",
            "gcide \"cat\"",
            "gcide \"catalog\"",
            "wn \"Cat\"",
        ]))
        .unwrap();

        let words: Vec<_> = matches.iter().map(Match::word).collect();
        assert_eq!(words, vec!["cat", "catalog", "Cat"]);
        assert_eq!(matches[0].database(), "wn");
    }

    #[test]
    fn test_decode_two_definitions() {
        let raw = lines(&[
            "151 \"cat\" wn \"WordNet (r) 3.0 (2006)\"",
            "cat",
            "    n 1: feline mammal",
            "    2: a spiteful woman gossip",
            ".",
            "151 \"cat\" gcide \"The Collaborative International Dictionary\"",
            "Cat \\Cat\\, n.",
            "   1. (Zool.) Any animal of the family Felidae",
            "   2. A double tripod",
            ".",
        ]);

        let defs = decode_definitions(&raw).unwrap();
        assert_eq!(defs.len(), 2);

        assert_eq!(defs[0].word(), "cat");
        assert_eq!(defs[0].database_name(), "wn");
        assert_eq!(
            defs[0].body(),
            "cat\n    n 1: feline mammal\n    2: a spiteful woman gossip"
        );

        assert_eq!(defs[1].database_name(), "gcide");
        assert_eq!(defs[1].lines().count(), 3);
        assert!(!defs[1].body().ends_with('.'));
    }

    #[test]
    fn test_definition_with_quoted_database() {
        let raw = lines(&["151 \"dog\" \"wn\" extra", "a canine", "."]);
        let defs = decode_definitions(&raw).unwrap();
        assert_eq!(defs[0].database_name(), "wn");
        assert_eq!(defs[0].body(), "a canine");
    }

    #[test]
    fn test_definition_text_may_look_like_header() {
        let raw = lines(&[
            "151 \"code\" jargon",
            "151 \"not\" a-header",
            ".",
        ]);
        let defs = decode_definitions(&raw).unwrap();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].body(), "151 \"not\" a-header");
    }

    #[test]
    fn test_definition_unstuffs_dot_lines() {
        let raw = lines(&["151 \"x\" wn", "..", "...more", "."]);
        let defs = decode_definitions(&raw).unwrap();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].body(), ".\n..more");
    }

    #[test]
    fn test_dot_line_then_header_like_text_stays_in_definition() {
        let raw = lines(&[
            "151 \"cat\" wn \"WordNet\"",
            "..",
            "151 \"fake\" other \"Injected\"",
            ".",
        ]);
        let defs = decode_definitions(&raw).unwrap();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].database_name(), "wn");
        assert_eq!(defs[0].body(), ".\n151 \"fake\" other \"Injected\"");
    }

    #[test]
    fn test_no_headers_yields_empty() {
        assert!(decode_definitions(&lines(&["stray text", "."])).unwrap().is_empty());
        assert!(decode_definitions(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_definition_missing_delimiter() {
        let raw = lines(&["151 \"cat\" wn", "text"]);
        assert_eq!(
            decode_definitions(&raw).unwrap_err(),
            ProtocolError::TruncatedBody("end of definition")
        );
    }

    #[test]
    fn test_malformed_header() {
        let raw = lines(&["151", "text", "."]);
        assert!(matches!(
            decode_definitions(&raw),
            Err(ProtocolError::MalformedLine { .. })
        ));
    }
}
