//! Logging configuration using the tracing ecosystem.
//!
//! Logging is configured from an explicit `LogConfig` built by the caller.
//! Library code only emits events; nothing in the client installs a
//! subscriber.
//!
//! Lines carry a timestamp, level, target and message. `RUST_LOG`
//! overrides the configured level.

use std::path::{Path, PathBuf};

use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Logging settings chosen by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Minimum level for this crate's events.
    pub level: Level,
    /// Write logs to this file instead of stderr.
    pub log_file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            log_file: None,
        }
    }
}

impl LogConfig {
    /// Map a `-v` count to a level: none is WARN, one is INFO, more is DEBUG.
    pub fn from_verbosity(verbose: u8) -> Self {
        let level = match verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        };
        Self {
            level,
            log_file: None,
        }
    }

    /// Send logs to a file.
    pub fn with_log_file(mut self, log_file: Option<PathBuf>) -> Self {
        self.log_file = log_file;
        self
    }

    /// The filter used when `RUST_LOG` is not set.
    ///
    /// Dependencies stay at WARN so `-vv` does not flood the output with
    /// HTTP internals.
    pub fn filter_directive(&self) -> String {
        format!(
            "{}={},warn",
            env!("CARGO_CRATE_NAME"),
            self.level.as_str().to_ascii_lowercase()
        )
    }
}

/// Initialize the logging system.
///
/// # Errors
///
/// Returns an error if:
/// - The log file cannot be created
/// - A global subscriber is already set
pub fn init(config: &LogConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter_directive()));

    let (file_layer, stderr_layer) = match &config.log_file {
        Some(path) => {
            let appender = file_appender(path)?;
            let layer = fmt::layer()
                .with_writer(appender)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), None)
        }
        None => {
            let layer = fmt::layer().with_writer(std::io::stderr).with_target(true);
            (None, Some(layer))
        }
    };

    let subscriber = tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .with(filter);

    tracing::subscriber::set_global_default(subscriber)?;

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "xrayctl starting up");

    Ok(())
}

/// Build a non-rotating appender for the given file path.
fn file_appender(path: &Path) -> anyhow::Result<RollingFileAppender> {
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Log file path has no file name: {}", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy().into_owned())
        .build(dir)?;
    Ok(appender)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(LogConfig::from_verbosity(0).level, Level::WARN);
        assert_eq!(LogConfig::from_verbosity(1).level, Level::INFO);
        assert_eq!(LogConfig::from_verbosity(2).level, Level::DEBUG);
        assert_eq!(LogConfig::from_verbosity(5).level, Level::DEBUG);
    }

    #[test]
    fn test_default_is_warn() {
        assert_eq!(LogConfig::default(), LogConfig::from_verbosity(0));
    }

    #[test]
    fn test_filter_directive() {
        assert_eq!(LogConfig::from_verbosity(1).filter_directive(), "xrayctl=info,warn");
        assert_eq!(LogConfig::from_verbosity(2).filter_directive(), "xrayctl=debug,warn");
    }

    #[test]
    fn test_file_appender_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xrayctl.log");
        file_appender(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_file_appender_rejects_directory_path() {
        assert!(file_appender(Path::new("/")).is_err());
    }
}
