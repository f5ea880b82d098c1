use anyhow::Result;
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Directory log files are written to: `<config dir>/xpeng/logs`
pub fn logs_dir() -> Result<PathBuf> {
    let config_dir =
        dirs::config_dir().ok_or(anyhow::anyhow!("Could not find config directory"))?;

    Ok(logs_dir_in(&config_dir))
}

fn logs_dir_in(config_dir: &Path) -> PathBuf {
    config_dir.join("xpeng").join("logs")
}

/// `xpeng-YYYY-MM-DD-HH-MM-SS.log`
pub fn log_file_name() -> String {
    format!("xpeng-{}.log", Local::now().format("%Y-%m-%d-%H-%M-%S"))
}

/// Initialize tracing to stderr and a timestamped file under [`logs_dir`].
///
/// The filter defaults to `info` and is overridden by `RUST_LOG`. Keep the
/// returned guard alive until exit or buffered file output is lost.
pub fn init_logging() -> Result<(PathBuf, WorkerGuard)> {
    let logs_dir = logs_dir()?;
    std::fs::create_dir_all(&logs_dir)?;

    init_logging_in(&logs_dir)
}

fn init_logging_in(logs_dir: &Path) -> Result<(PathBuf, WorkerGuard)> {
    let log_filename = log_file_name();
    let log_path = logs_dir.join(&log_filename);

    let file_appender = tracing_appender::rolling::never(logs_dir, &log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true);

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()?;

    Ok((log_path, guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_name_is_timestamped() {
        let name = log_file_name();

        assert!(name.starts_with("xpeng-"));
        assert!(name.ends_with(".log"));
        // xpeng- + 19 chars of timestamp + .log
        assert_eq!(name.len(), 6 + 19 + 4);
    }

    #[test]
    fn logs_live_under_the_config_dir() {
        let dir = logs_dir_in(Path::new("/home/user/.config"));

        assert_eq!(dir, Path::new("/home/user/.config/xpeng/logs"));
    }

    #[test]
    fn init_writes_to_a_timestamped_file() {
        let temp = tempfile::tempdir().unwrap();
        let logs_dir = temp.path().join("logs");

        let (log_path, guard) = init_logging_in(&logs_dir).unwrap();

        assert_eq!(log_path.parent(), Some(logs_dir.as_path()));
        assert!(log_path.is_file());

        tracing::error!("written to the log file");
        drop(guard);

        let contents = std::fs::read_to_string(&log_path).unwrap();
        assert!(contents.contains("written to the log file"));
    }
}
