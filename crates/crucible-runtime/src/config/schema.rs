//! Host configuration schema.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root host configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Path to the system-wide configuration file shared by all services.
    #[serde(default = "default_system_config")]
    pub system_config: PathBuf,

    /// Service directories to load at startup (each holds a manifest).
    #[serde(default)]
    pub service_dirs: Vec<PathBuf>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            system_config: default_system_config(),
            service_dirs: Vec::new(),
        }
    }
}

fn default_system_config() -> PathBuf {
    PathBuf::from("config/system.yaml")
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default)]
    pub level: LogLevel,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include thread IDs in log output.
    #[serde(default)]
    pub thread_ids: bool,
}

/// Log level for the host and its services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level (default).
    #[default]
    Info,
    /// Warn level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Returns the level as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Converts to a `tracing` level.
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Compact single-line output (default).
    #[default]
    Compact,
    /// Full fmt output.
    Full,
    /// Multi-line human-friendly output.
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = HostConfig::default();
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert_eq!(config.system_config, PathBuf::from("config/system.yaml"));
        assert!(config.service_dirs.is_empty());
    }

    #[test]
    fn log_level_parses_lowercase() {
        let level: LogLevel = serde_json::from_str("\"debug\"").unwrap();
        assert_eq!(level, LogLevel::Debug);
        assert_eq!(level.to_tracing_level(), tracing::Level::DEBUG);
    }
}
