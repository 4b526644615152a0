use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "focuscal.log";

/// Filter used when RUST_LOG is unset: each -v raises the level past the
/// configured one.
pub(crate) fn default_directive(verbose: u8, configured: &str) -> &str {
    match verbose {
        0 => configured,
        1 => "debug",
        _ => "trace",
    }
}

/// Sends tracing output to `<dir>/focuscal.log`; stdout and stderr belong to
/// the terminal UI. Keep the returned guard alive until exit so buffered
/// lines are flushed.
pub fn init_tracing(dir: &Path, verbose: u8, configured: &str) -> Result<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(verbose, configured)))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log dir {}", dir.display()))?;
    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(guard)
}
