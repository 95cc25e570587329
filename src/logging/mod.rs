// Logging: tracing setup for diagnostics, and the JSONL transcript of the console

pub mod transcript;

pub use transcript::{TranscriptRecord, TranscriptWriter};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::constants::DEFAULT_LOG_LEVEL;

/// Install the global tracing subscriber.
///
/// Precedence: explicit `level` (CLI), then `RUST_LOG`, then `config_level`,
/// then the default. Output goes to stderr so it never mixes with results.
pub fn init_tracing(level: Option<&str>, config_level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config_level.unwrap_or(DEFAULT_LOG_LEVEL))),
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
