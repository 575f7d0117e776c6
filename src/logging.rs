use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::config_dir;

/// Keeps the background log writer alive; logs stop flushing once dropped.
pub(crate) struct LoggingGuard {
    _guard: WorkerGuard,
}

fn log_dir() -> Option<PathBuf> {
    let preferred = config_dir().map(|dir| dir.join("logs"));
    if let Some(dir) = preferred
        && std::fs::create_dir_all(&dir).is_ok()
    {
        return Some(dir);
    }
    let dir = std::env::temp_dir().join("pyide").join("logs");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// Routes `tracing` output to a daily log file. The terminal belongs to the
/// UI, so nothing is written to stdout or stderr.
pub(crate) fn init() -> Option<LoggingGuard> {
    let log_dir = log_dir()?;
    let file_appender = tracing_appender::rolling::daily(&log_dir, "pyide.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pyide=info"));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true),
    );
    if subscriber.try_init().is_err() {
        return None;
    }

    tracing::info!(log_dir = %log_dir.display(), "logging initialized");
    Some(LoggingGuard { _guard: guard })
}
