//! File logging. The terminal belongs to the TUI, so nothing is written to stderr.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_LEVEL: &str = "info";

/// Build the filter from an explicit level, else `RUST_LOG`, else [`DEFAULT_LEVEL`].
pub fn env_filter(level: Option<&str>) -> Result<EnvFilter> {
    match level {
        Some(level) => EnvFilter::try_new(level).context("invalid log level"),
        None => EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(DEFAULT_LEVEL))
            .context("invalid RUST_LOG filter"),
    }
}

/// Install the global subscriber writing to `log_file`.
///
/// The returned guard flushes the writer when dropped; keep it for the whole session.
pub fn init_logging(log_file: &Path, level: Option<&str>) -> Result<WorkerGuard> {
    let filter = env_filter(level)?;
    let dir = log_file
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_file
        .file_name()
        .context("log file path has no file name")?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(guard)
}
