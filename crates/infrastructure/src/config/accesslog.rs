//! Access log engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::common::default_true;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessLogConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Capacity bound on the in-memory store. Oldest entries are evicted
    /// when the bound is exceeded. Default: 10,000.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Retention window in hours for the periodic TTL sweep. Default: 24.
    #[serde(default = "default_retention_hours")]
    pub retention_hours: u32,

    /// Interval between TTL sweeps in seconds. Default: 3600.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl AccessLogConfig {
    /// Retention window as a `Duration`, the shape `AccessLogRuntime`
    /// takes at startup.
    pub fn retention(&self) -> Duration {
        Duration::from_secs(u64::from(self.retention_hours) * 3_600)
    }

    /// Sweep interval as a `Duration`.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

fn default_max_entries() -> usize {
    10_000
}
fn default_retention_hours() -> u32 {
    24
}
fn default_sweep_interval_secs() -> u64 {
    3_600
}

impl Default for AccessLogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: default_max_entries(),
            retention_hours: default_retention_hours(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_retention_is_24_hours() {
        let config = AccessLogConfig::default();
        assert_eq!(config.retention(), Duration::from_secs(24 * 60 * 60));
    }

    #[test]
    fn default_sweep_interval_is_hourly() {
        let config = AccessLogConfig::default();
        assert_eq!(config.sweep_interval(), Duration::from_secs(3_600));
    }
}
