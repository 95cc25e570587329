// Configuration loader
// Loads settings from ~/.minidb/config.toml, then applies environment overrides

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, SERVER_URL_ENV};
use super::settings::Config;

/// Default location of the config file, if a home directory is known
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load configuration.
///
/// An explicit `path` must exist. Without one, `~/.minidb/config.toml` is
/// used when present and built-in defaults otherwise. `MINIDB_SERVER_URL`
/// overrides the file and `server` (from `--server`) overrides both.
/// Validation runs once, after every override.
pub fn load_config(path: Option<&Path>, server: Option<&str>) -> Result<Config> {
    let env_url = std::env::var(SERVER_URL_ENV).ok();
    load_with_overrides(path, env_url.as_deref(), server)
}

fn load_with_overrides(
    path: Option<&Path>,
    env_url: Option<&str>,
    server: Option<&str>,
) -> Result<Config> {
    let mut config = match path {
        Some(path) => {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            load_from_file(path)?
        }
        None => match default_config_path() {
            Some(default) if default.exists() => load_from_file(&default)?,
            _ => {
                tracing::debug!("No config file found, using defaults");
                Config::default()
            }
        },
    };

    apply_server_override(&mut config, env_url);
    apply_server_override(&mut config, server);

    config
        .validate()
        .context("Configuration validation failed")?;

    Ok(config)
}

/// Parse a TOML config file without applying overrides
pub fn load_from_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let config: Config = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;

    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

fn apply_server_override(config: &mut Config, url: Option<&str>) {
    if let Some(url) = url.map(str::trim).filter(|url| !url.is_empty()) {
        config.server.base_url = url.to_string();
    }
}
