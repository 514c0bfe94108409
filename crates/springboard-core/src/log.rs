//! Tracing setup.
//!
//! With file logging enabled, events go to a daily-rolling file under
//! `~/.config/springboard/logs/`; otherwise they are written to stderr.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{Builder, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Environment variable that overrides the configured level, using
/// `EnvFilter` syntax (e.g. `springboard_core=debug`).
pub const LOG_ENV: &str = "SPRINGBOARD_LOG";

const LOG_FILE_PREFIX: &str = "springboard";
const LOG_FILE_SUFFIX: &str = "log";

static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Whether file logging is enabled. Defaults to `false`.
    pub enabled: bool,
    /// Minimum log level: "debug", "info", "warn", or "error".
    pub level: String,
    /// Number of rotated log files to keep.
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".into(),
            max_files: 5,
        }
    }
}

/// Maps the configured level to a filter directive. Unknown values
/// fall back to `info`.
pub fn level_directive(level: &str) -> &'static str {
    match level.to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" | "warning" => "warn",
        "error" => "error",
        _ => "info",
    }
}

/// Installs the global subscriber. Call once at startup.
///
/// Returns the guard of the background file writer; keep it alive
/// until exit or buffered lines are lost. Later calls do nothing and
/// return `None`.
pub fn init(config: &LogConfig) -> Option<WorkerGuard> {
    if INITIALIZED.set(()).is_err() {
        return None;
    }
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(level_directive(&config.level)));

    if config.enabled
        && let Some(dir) = crate::config::config_dir()
    {
        let appender = Builder::new()
            .rotation(Rotation::DAILY)
            .filename_prefix(LOG_FILE_PREFIX)
            .filename_suffix(LOG_FILE_SUFFIX)
            .max_log_files(config.max_files.max(1))
            .build(dir.join("logs"));
        match appender {
            Ok(appender) => {
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let _ = tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().with_writer(writer).with_ansi(false))
                    .try_init();
                return Some(guard);
            }
            Err(e) => eprintln!("Warning: could not open log directory: {e}"),
        }
    }

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .try_init();
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_levels_map_to_themselves() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            assert_eq!(level_directive(level), level);
        }
    }

    #[test]
    fn level_is_case_insensitive() {
        assert_eq!(level_directive("DEBUG"), "debug");
        assert_eq!(level_directive("Warning"), "warn");
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        assert_eq!(level_directive("verbose"), "info");
        assert_eq!(level_directive(""), "info");
    }

    #[test]
    fn second_init_is_noop() {
        // Arrange
        let config = LogConfig::default();

        // Act
        let _ = init(&config);
        let second = init(&config);

        // Assert
        assert!(second.is_none());
    }
}
