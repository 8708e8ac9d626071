//! Logging setup using tracing + tracing-subscriber
//!
//! The terminal belongs to the UI, so events go to a log file.
//! `RUST_LOG` overrides the configured level when set.

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingSettings;

/// Initialize the global subscriber. Call once, before the UI starts.
pub fn init_logging(settings: &LoggingSettings) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.file)
        .with_context(|| format!("opening log file {}", settings.file.display()))?;

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(build_env_filter(&settings.level))
        .with(file_layer)
        .try_init()
        .context("installing tracing subscriber")?;

    tracing::info!(
        level = %settings.level,
        file = %settings.file.display(),
        "Logging initialized"
    );

    Ok(())
}

fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_accepts_configured_levels() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            let filter = build_env_filter(level);
            assert!(!filter.to_string().is_empty());
        }
    }

    #[test]
    fn test_unwritable_log_file_is_an_error() {
        let settings = LoggingSettings {
            level: "info".to_string(),
            file: std::env::temp_dir()
                .join("persona-table-missing-dir")
                .join("nested")
                .join("app.log"),
        };

        let err = init_logging(&settings).unwrap_err();
        assert!(err.to_string().contains("opening log file"));
    }
}
