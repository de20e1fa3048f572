//! Tracing initialization
//!
//! Console layer filtered by `RUST_LOG` (default `info`), with an optional
//! daily-rotated file layer under the work directory.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialize console-only logging
pub fn init_logger() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize console + daily-rotated file logging
///
/// Returns the appender guard; the caller must hold it for the process
/// lifetime or buffered lines are lost on exit.
pub fn init_logger_with_file(log_dir: impl AsRef<Path>) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(log_dir, "floor-server.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .init();

    guard
}
