//! DICT lookup example
//!
//! Connects to a DICT server, lists what it offers or looks a word up.
//!
//! Run with:
//!
//! ```bash
//! # Databases and strategies offered by dict.org
//! cargo run --example lookup -- --host dict.org --list
//!
//! # Matches and definitions for a word
//! cargo run --example lookup -- --host dict.org --strategy prefix rust
//!
//! # Settings from a file, JSON output
//! cargo run --example lookup -- --config dict.toml --json serendipity
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use dict_workspace::{
    connect_with, init_logging, ClientConfig, ClientError, Database, MatchingStrategy,
};

/// Query a DICT (RFC 2229) server
#[derive(Parser, Debug)]
#[command(name = "lookup")]
#[command(author, version, about)]
struct Args {
    /// Server hostname
    #[arg(short = 'H', long, env = "DICT_HOST")]
    host: Option<String>,

    /// Server port
    #[arg(short, long, env = "DICT_PORT")]
    port: Option<u16>,

    /// TOML configuration file
    #[arg(short, long, env = "DICT_CONFIG")]
    config: Option<PathBuf>,

    /// Database to search (`*` for all, `!` for the first with a match)
    #[arg(short, long)]
    database: Option<String>,

    /// Matching strategy (`.` for the server default)
    #[arg(short, long)]
    strategy: Option<String>,

    /// List databases and strategies instead of looking up a word
    #[arg(short, long)]
    list: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "DICT_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Word to look up
    #[arg(required_unless_present = "list")]
    word: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let mut config = match &args.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    };
    if let Some(host) = args.host.clone() {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(database) = args.database.clone() {
        config.database = database;
    }
    if let Some(strategy) = args.strategy.clone() {
        config.strategy = strategy;
    }

    let client = connect_with(&config)
        .with_context(|| format!("Failed to connect to {}", config.address()))?;
    if let Some(banner) = client.greeting() {
        info!(banner = banner.text(), "Connected");
    }

    let result = match &args.word {
        Some(word) if !args.list => lookup(&client, &config, word, args.json),
        _ => list(&client, args.json),
    };

    client.close();
    result
}

fn list(client: &dict_workspace::TcpDictClient, json: bool) -> Result<()> {
    let databases = client.list_databases().context("SHOW DB failed")?;
    let strategies = client.list_strategies().context("SHOW STRATEGIES failed")?;

    if json {
        let out = serde_json::json!({ "databases": databases, "strategies": strategies });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Databases:");
    for db in &databases {
        println!("  {:<12} {}", db.name(), db.description());
    }
    println!("\nStrategies:");
    for strategy in &strategies {
        println!("  {:<12} {}", strategy.name(), strategy.description());
    }
    Ok(())
}

fn lookup(
    client: &dict_workspace::TcpDictClient,
    config: &ClientConfig,
    word: &str,
    json: bool,
) -> Result<()> {
    let database = Database::new(config.database.as_str(), "")?;
    let strategy = MatchingStrategy::new(config.strategy.as_str(), "")?;

    let matches = match client.match_word(word, &strategy, &database) {
        Ok(matches) => matches,
        Err(ClientError::CommandRejected { code, text }) => {
            anyhow::bail!("Server rejected MATCH: {} {}", code, text)
        }
        Err(e) => return Err(e).context("MATCH failed"),
    };
    let definitions = client.define(word, &database).context("DEFINE failed")?;

    if json {
        let out = serde_json::json!({ "matches": matches, "definitions": definitions });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if matches.is_empty() {
        println!("No matches for {word:?}");
    } else {
        let words: Vec<_> = matches.iter().map(|m| m.word()).collect();
        println!("Matches: {}", words.join(", "));
    }

    for definition in &definitions {
        println!("\n--- {} ({}) ---", definition.word(), definition.database_name());
        println!("{}", definition.body());
    }
    Ok(())
}
