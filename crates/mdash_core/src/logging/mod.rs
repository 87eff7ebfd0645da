//! Logging infrastructure for the model dashboard.
//!
//! Everything logs through `tracing`; this module only installs the global
//! subscriber. `RUST_LOG` always wins over the configured level.

mod types;

pub use types::LogLevel;

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize global tracing subscriber writing to stderr.
///
/// Should be called once at application startup.
pub fn init_tracing(default_level: LogLevel) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false).with_writer(std::io::stderr))
        .with(env_filter(default_level))
        .init();
}

/// Initialize tracing with stderr output plus a daily rolling file in `log_dir`.
///
/// The returned guard must be kept alive for the file writer to flush.
pub fn init_tracing_with_file(default_level: LogLevel, log_dir: &Path) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(log_dir, "model-dashboard.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .with(env_filter(default_level))
        .init();

    guard
}

/// Initialize tracing for tests (only logs warnings and above).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

fn env_filter(default_level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level.as_filter_str()))
}
