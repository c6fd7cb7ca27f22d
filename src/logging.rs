use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const LOG_FILE: &str = "powerhell.log";
pub const LOG_ENV: &str = "POWERHELL_LOG";

pub fn log_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("logs")
}

/// Non-blocking writer appending to `<log_dir>/powerhell.log`.
pub fn file_writer(log_dir: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    fs::create_dir_all(log_dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE)
        .build(log_dir)?;
    Ok(tracing_appender::non_blocking(appender))
}

/// Install the global subscriber. The terminal belongs to the UI, so when the
/// log file cannot be opened events are discarded and the app carries on.
/// Returns the worker guard (keep it alive until exit) and the reason file
/// logging is off, if it is.
pub fn init(log_dir: &Path, default_level: &str) -> (Option<WorkerGuard>, Option<anyhow::Error>) {
    let (writer, guard, failure) = match file_writer(log_dir) {
        Ok((writer, guard)) => (BoxMakeWriter::new(writer), Some(guard), None),
        Err(err) => (BoxMakeWriter::new(std::io::sink), None, Some(err)),
    };

    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();

    (guard, failure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn log_dir_is_created_under_data_dir() {
        let dir = TempDir::new().unwrap();
        let logs = log_dir(&dir.path().join("data"));
        let (_writer, _guard) = file_writer(&logs).unwrap();
        assert!(logs.is_dir());
        assert!(logs.join(LOG_FILE).exists());
    }

    #[test]
    fn data_dir_that_is_a_file_fails_without_panicking() {
        let dir = TempDir::new().unwrap();
        let data_file = dir.path().join("not-a-dir");
        fs::write(&data_file, "").unwrap();

        assert!(file_writer(&log_dir(&data_file)).is_err());
    }
}
