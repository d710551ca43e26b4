//! Structured logging built on the `tracing` crate.
//!
//! Logs always go to stderr so report output on stdout stays clean for
//! piping. The `NBSYNC_LOG` environment variable overrides the configured
//! level with a full filter directive.

use crate::error::SyncError;
use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Logging configuration, settable from `nbsync.yml` and CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Enable colored output (text format only)
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_format(),
            color: default_true(),
        }
    }
}

/// Initialize the global subscriber. Call once, before any sync work.
pub fn init_logging(config: &LoggingConfig) -> Result<(), SyncError> {
    let filter = match EnvFilter::try_from_env("NBSYNC_LOG") {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| SyncError::Config(format!("invalid log level: {}", e)))?,
    };

    let base_subscriber = Registry::default().with(filter);
    match config.format.as_str() {
        "json" => {
            base_subscriber
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_timer(ChronoUtc::rfc_3339())
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        "text" => {
            base_subscriber
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_timer(ChronoUtc::rfc_3339())
                        .with_ansi(config.color)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        other => {
            return Err(SyncError::Config(format!(
                "invalid log format: {} (must be 'json' or 'text')",
                other
            )));
        }
    }
    Ok(())
}
