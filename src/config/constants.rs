// Project-wide constants
//
// Centralised here so addresses and file names have one source of truth.

/// Address of a MiniDB service started with its defaults.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Environment variable that overrides the configured server address.
pub const SERVER_URL_ENV: &str = "MINIDB_SERVER_URL";

/// Directory under `$HOME` holding the config file and console history.
pub const CONFIG_DIR_NAME: &str = ".minidb";

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Prompt shown by the interactive console.
pub const DEFAULT_PROMPT: &str = "DB> ";

/// Log filter used when neither the CLI, `RUST_LOG`, nor the config sets one.
pub const DEFAULT_LOG_LEVEL: &str = "warn";
