use std::path::PathBuf;

use anyhow::{anyhow, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "tracelet-backend.log";

#[derive(Debug, Default, Clone)]
pub struct LogOptions {
    pub log_dir: Option<PathBuf>,
    pub json: bool,
}

/// Installs the global subscriber. Keep the returned guard alive for the
/// lifetime of the process so buffered file output is flushed on exit.
pub fn init(options: &LogOptions) -> Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_writer, guard) = match &options.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match (file_writer, options.json) {
        (Some(file), true) => builder
            .json()
            .with_writer(std::io::stdout.and(file))
            .try_init(),
        (Some(file), false) => builder
            .with_ansi(false)
            .with_writer(std::io::stdout.and(file))
            .try_init(),
        (None, true) => builder.json().try_init(),
        (None, false) => builder.try_init(),
    };
    result.map_err(|err| anyhow!("failed to install tracing subscriber: {}", err))?;
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_logging_creates_directory() {
        let dir = std::env::temp_dir().join(format!("tracelet-logs-{}", std::process::id()));
        let guard = init(&LogOptions {
            log_dir: Some(dir.clone()),
            json: true,
        })
        .expect("subscriber installs once per process");
        assert!(guard.is_some());
        assert!(dir.is_dir());
        drop(guard);
        let _ = std::fs::remove_dir_all(dir);
    }
}
