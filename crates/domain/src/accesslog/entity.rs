use serde::{Deserialize, Serialize};

/// Heuristic risk classification computed once per entry at ingest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatLevel {
    None,
    Low,
    Medium,
    High,
}

impl ThreatLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parse a level name string. Defaults to `None` for unrecognized values.
    pub fn parse_name(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            _ => Self::None,
        }
    }
}

impl std::fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Security flags stamped onto an entry at ingest, never recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityInfo {
    pub rate_limited: bool,
    pub security_violation: bool,
    pub threat_level: ThreatLevel,
}

/// Per-entry timing breakdown. Only server-side processing is measured
/// today; the remaining sub-fields of the original record were reserved
/// and are not carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceInfo {
    pub server_processing_ms: u64,
}

/// One immutable record describing a single observed request and its
/// outcome.
///
/// Entries are write-once: no field mutates after the entry enters the
/// store. The `permanent_token` field is always the redacted form — the
/// raw token is truncated by [`redact_token`] before the entry exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessLogEntry {
    /// Process-unique identifier: millis-hex timestamp plus a random suffix.
    pub id: String,
    /// Creation time, unix milliseconds. The store appends in creation
    /// order, so the sequence is implicitly time-ordered.
    pub timestamp_ms: u64,
    pub method: String,
    pub path: String,
    pub status_code: u16,
    pub response_time_ms: u64,
    pub client_ip: String,
    pub user_agent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referer: Option<String>,
    /// Redacted token: at most [`TOKEN_PREFIX_LEN`] original characters
    /// followed by the truncation marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permanent_token: Option<String>,
    /// Caller-supplied outcome flag, independent of `status_code`.
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub security: SecurityInfo,
    pub performance: PerformanceInfo,
}

/// Number of original token characters that survive redaction.
pub const TOKEN_PREFIX_LEN: usize = 8;

/// Marker appended to a redacted token.
pub const TOKEN_REDACTION_MARKER: &str = "...";

/// Irreversibly truncate a sensitive token to a short prefix.
///
/// The full token must never be retained; callers redact before an
/// `AccessLogEntry` is constructed.
pub fn redact_token(token: &str) -> String {
    let prefix: String = token.chars().take(TOKEN_PREFIX_LEN).collect();
    format!("{prefix}{TOKEN_REDACTION_MARKER}")
}

/// Generate a process-unique entry id from the current time and a random
/// suffix. Ids are never reused within a store's lifetime.
pub fn generate_entry_id(timestamp_ms: u64) -> String {
    let suffix: u32 = rand::random();
    format!("{timestamp_ms:x}-{suffix:08x}")
}

/// Returns current wall-clock time as milliseconds since UNIX epoch.
#[allow(clippy::cast_possible_truncation)]
pub fn current_timestamp_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
