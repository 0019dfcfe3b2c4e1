//! Client configuration

use std::path::Path;
use std::time::Duration;

use dict_core::{ALL_DATABASES, DEFAULT_STRATEGY};
use serde::Deserialize;

use crate::connect::DEFAULT_PORT;
use crate::error::{ClientError, ClientResult};

/// Connection settings and lookup defaults
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server hostname
    pub host: String,
    /// Server port
    pub port: u16,
    /// Give up connecting after this many milliseconds (no limit when unset).
    /// Only the connect step is bounded; exchanges never time out.
    pub connect_timeout_ms: Option<u64>,
    /// Database used when none is given
    pub database: String,
    /// Matching strategy used when none is given
    pub strategy: String,
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Parse a TOML document
    pub fn from_toml_str(s: &str) -> ClientResult<Self> {
        toml::from_str(s).map_err(|e| ClientError::Config(e.to_string()))
    }

    /// Load a TOML file
    pub fn load(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&contents)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            connect_timeout_ms: None,
            database: ALL_DATABASES.to_string(),
            strategy: DEFAULT_STRATEGY.to_string(),
        }
    }
}
