// Configuration structs

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::constants::{DEFAULT_PROMPT, DEFAULT_SERVER_URL};

/// Where the MiniDB service lives and how long to wait for it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the service (e.g. "http://127.0.0.1:5000")
    pub base_url: String,

    /// Per-request timeout in seconds. Absent means requests may wait forever.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVER_URL.to_string(),
            request_timeout_secs: None,
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Interactive console behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub prompt: String,

    /// Line-editor history file (none = history kept in memory only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_path: Option<PathBuf>,

    /// Append every displayed log entry to this JSONL file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript_path: Option<PathBuf>,

    /// Colour log entries by kind
    pub color: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            history_path: None,
            transcript_path: None,
            color: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub console: ConsoleConfig,

    /// tracing filter directive, e.g. "debug" or "minidb_console=trace"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Config {
    /// Validate configuration and return helpful errors
    pub fn validate(&self) -> anyhow::Result<()> {
        let url = reqwest::Url::parse(&self.server.base_url)
            .with_context(|| format!("Invalid server URL: '{}'", self.server.base_url))?;

        if !matches!(url.scheme(), "http" | "https") {
            bail!(
                "Server URL must use http or https, got '{}'\n\
                 Example: base_url = \"{}\"",
                url.scheme(),
                DEFAULT_SERVER_URL
            );
        }

        if self.server.request_timeout_secs == Some(0) {
            bail!("request_timeout_secs must be greater than zero (omit it to disable the timeout)");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert_eq!(config.server.base_url, DEFAULT_SERVER_URL);
        assert!(config.server.request_timeout().is_none());
        assert_eq!(config.console.prompt, "DB> ");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_unparseable_url() {
        let mut config = Config::default();
        config.server.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let mut config = Config::default();
        config.server.base_url = "ftp://127.0.0.1:5000".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let mut config = Config::default();
        config.server.request_timeout_secs = Some(0);
        assert!(config.validate().is_err());
    }
}
