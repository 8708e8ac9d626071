//! Runtime configuration
//!
//! Only logging is configurable. Values come from the environment:
//! - `PERSONA_TABLE_LOG`: log filter level (default `info`)
//! - `PERSONA_TABLE_LOG_FILE`: log file path (default `<tmp>/persona-table.log`)

use std::path::PathBuf;

use thiserror::Error;

pub const LOG_LEVEL_VAR: &str = "PERSONA_TABLE_LOG";
pub const LOG_FILE_VAR: &str = "PERSONA_TABLE_LOG_FILE";

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid log level '{0}' (expected one of trace, debug, info, warn, error)")]
    InvalidLevel(String),

    #[error("{0} is set but empty")]
    EmptyPath(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub level: String,
    pub file: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            level: "info".to_string(),
            file: std::env::temp_dir().join("persona-table.log"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub logging: LoggingSettings,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; missing keys fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut logging = LoggingSettings::default();

        if let Some(level) = lookup(LOG_LEVEL_VAR) {
            let level = level.trim().to_lowercase();
            let level = if level == "warning" { "warn".to_string() } else { level };
            if !LEVELS.contains(&level.as_str()) {
                return Err(ConfigError::InvalidLevel(level));
            }
            logging.level = level;
        }

        if let Some(file) = lookup(LOG_FILE_VAR) {
            if file.trim().is_empty() {
                return Err(ConfigError::EmptyPath(LOG_FILE_VAR));
            }
            logging.file = PathBuf::from(file);
        }

        Ok(AppConfig { logging })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.file.ends_with("persona-table.log"));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (LOG_LEVEL_VAR, " DEBUG "),
            (LOG_FILE_VAR, "/var/log/personas.log"),
        ]))
        .unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, PathBuf::from("/var/log/personas.log"));
    }

    #[test]
    fn test_warning_alias() {
        let config = AppConfig::from_lookup(lookup_from(&[(LOG_LEVEL_VAR, "warning")])).unwrap();
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            AppConfig::from_lookup(lookup_from(&[(LOG_LEVEL_VAR, "loud")])),
            Err(ConfigError::InvalidLevel("loud".to_string()))
        );
        assert_eq!(
            AppConfig::from_lookup(lookup_from(&[(LOG_FILE_VAR, "  ")])),
            Err(ConfigError::EmptyPath(LOG_FILE_VAR))
        );
    }
}
