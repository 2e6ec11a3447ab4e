//! Engine configuration: structs, parsing, and validation.
//!
//! Split across sub-modules:
//! - `common`: shared helpers and `ConfigError`
//! - `accesslog`: access log store and sweep settings

mod accesslog;
mod common;

pub use accesslog::AccessLogConfig;
pub use common::ConfigError;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_ENTRIES_LIMIT, SWEEP_INTERVAL_FLOOR};

// ── Top-level config ───────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReqwatchConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub access_log: AccessLogConfig,
}

impl ReqwatchConfig {
    /// Load config from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate config from a YAML string.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml_ng::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.access_log.max_entries == 0 {
            return Err(ConfigError::Validation {
                field: "access_log.max_entries".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.access_log.max_entries > MAX_ENTRIES_LIMIT {
            return Err(ConfigError::Validation {
                field: "access_log.max_entries".to_string(),
                message: format!("exceeds the limit of {MAX_ENTRIES_LIMIT}"),
            });
        }
        if self.access_log.retention_hours == 0 {
            return Err(ConfigError::Validation {
                field: "access_log.retention_hours".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.access_log.sweep_interval_secs < SWEEP_INTERVAL_FLOOR.as_secs() {
            return Err(ConfigError::Validation {
                field: "access_log.sweep_interval_secs".to_string(),
                message: format!(
                    "must be at least {} seconds",
                    SWEEP_INTERVAL_FLOOR.as_secs()
                ),
            });
        }
        Ok(())
    }
}

// ── Logging ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,

    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Flattened JSON, log-aggregator compatible (production).
    #[default]
    Json,
    /// Human-readable colored output (development).
    Text,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_yields_defaults() {
        let config = ReqwatchConfig::from_yaml("{}").unwrap();
        assert!(config.access_log.enabled);
        assert_eq!(config.access_log.max_entries, 10_000);
        assert_eq!(config.access_log.retention_hours, 24);
        assert_eq!(config.access_log.sweep_interval_secs, 3_600);
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn parses_full_config() {
        let yaml = r"
logging:
  level: debug
  format: text
access_log:
  enabled: true
  max_entries: 500
  retention_hours: 48
  sweep_interval_secs: 600
";
        let config = ReqwatchConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Text);
        assert_eq!(config.access_log.max_entries, 500);
        assert_eq!(config.access_log.retention_hours, 48);
        assert_eq!(config.access_log.sweep_interval_secs, 600);
    }

    #[test]
    fn rejects_zero_max_entries() {
        let yaml = "access_log:\n  max_entries: 0\n";
        assert!(matches!(
            ReqwatchConfig::from_yaml(yaml),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn rejects_oversized_max_entries() {
        let yaml = "access_log:\n  max_entries: 2000000\n";
        assert!(ReqwatchConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn rejects_zero_retention() {
        let yaml = "access_log:\n  retention_hours: 0\n";
        assert!(ReqwatchConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn rejects_sub_minute_sweep_interval() {
        let yaml = "access_log:\n  sweep_interval_secs: 5\n";
        assert!(ReqwatchConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn rejects_unknown_fields() {
        let yaml = "acces_log:\n  max_entries: 10\n";
        assert!(ReqwatchConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn invalid_yaml_is_a_parse_error() {
        assert!(matches!(
            ReqwatchConfig::from_yaml(":::not yaml"),
            Err(ConfigError::Yaml(_))
        ));
    }
}
