use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Path of the log file. Logging is off when unset, since the terminal belongs to the UI.
pub const LOG_PATH_ENV: &str = "KATA_LOG";
/// Filter directives, e.g. `debug` or `kata::report=trace`.
pub const LOG_LEVEL_ENV: &str = "KATA_LOG_LEVEL";

/// Install a file-backed subscriber if `KATA_LOG` is set.
pub fn init() -> Result<()> {
    let Ok(path) = std::env::var(LOG_PATH_ENV) else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path))?;

    let filter =
        EnvFilter::try_from_env(LOG_LEVEL_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install logger: {}", e))
}
