use super::entity::{AccessLogEntry, ThreatLevel};

/// Filter parameters for querying stored access log entries.
///
/// All active fields combine with AND semantics. Absent fields impose no
/// constraint; a contradictory range (`to_ms < from_ms`) simply matches
/// nothing rather than erroring.
#[derive(Debug, Clone, Default)]
pub struct AccessLogQuery {
    /// Start of time range (inclusive, unix milliseconds).
    pub from_ms: Option<u64>,
    /// End of time range (inclusive, unix milliseconds).
    pub to_ms: Option<u64>,
    /// Exact client IP match.
    pub client_ip: Option<String>,
    /// Exact status code match.
    pub status_code: Option<u16>,
    /// Exact outcome-flag match.
    pub success: Option<bool>,
    /// Substring match on the request path.
    pub path_contains: Option<String>,
    /// Lower bound on response time (inclusive, milliseconds).
    pub min_response_time_ms: Option<u64>,
    /// Upper bound on response time (inclusive, milliseconds).
    pub max_response_time_ms: Option<u64>,
    /// Exact threat level match.
    pub threat_level: Option<ThreatLevel>,
}

impl AccessLogQuery {
    /// Check whether an `AccessLogEntry` matches all active filters.
    pub fn matches(&self, entry: &AccessLogEntry) -> bool {
        if let Some(from) = self.from_ms
            && entry.timestamp_ms < from
        {
            return false;
        }
        if let Some(to) = self.to_ms
            && entry.timestamp_ms > to
        {
            return false;
        }
        if let Some(ref ip) = self.client_ip
            && entry.client_ip != *ip
        {
            return false;
        }
        if let Some(status) = self.status_code
            && entry.status_code != status
        {
            return false;
        }
        if let Some(success) = self.success
            && entry.success != success
        {
            return false;
        }
        if let Some(ref fragment) = self.path_contains
            && !entry.path.contains(fragment)
        {
            return false;
        }
        if let Some(min) = self.min_response_time_ms
            && entry.response_time_ms < min
        {
            return false;
        }
        if let Some(max) = self.max_response_time_ms
            && entry.response_time_ms > max
        {
            return false;
        }
        if let Some(level) = self.threat_level
            && entry.security.threat_level != level
        {
            return false;
        }
        true
    }
}
