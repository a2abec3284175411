use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Keeps the non-blocking log writer alive; logs are flushed on drop.
pub struct LoggingGuard {
    _guard: WorkerGuard,
    pub log_dir: PathBuf,
}

fn log_dir() -> std::io::Result<PathBuf> {
    let dir = dirs::data_local_dir()
        .map(|d| d.join("cookfind").join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("cookfind").join("logs"));
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Send logs to a daily rolling file, since the terminal belongs to the UI.
///
/// Returns `None` when no log directory can be created or a subscriber is
/// already installed; the TUI runs without logs in that case.
pub fn init() -> Option<LoggingGuard> {
    let log_dir = log_dir().ok()?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "cookfind.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cookfind=info"));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true),
    );

    if subscriber.try_init().is_err() {
        return None;
    }

    tracing::info!(log_dir = %log_dir.display(), "tracing initialized");

    Some(LoggingGuard {
        _guard: guard,
        log_dir,
    })
}
