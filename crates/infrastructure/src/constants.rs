use std::time::Duration;

/// Default config file location.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/reqwatch/config.yaml";

// ── Store limits ───────────────────────────────────────────────────

/// Upper bound on the configurable entry capacity, to prevent OOM from
/// an over-generous config.
pub const MAX_ENTRIES_LIMIT: usize = 1_000_000;

/// Minimum allowed sweep interval.
pub const SWEEP_INTERVAL_FLOOR: Duration = Duration::from_secs(60);
