use domain::accesslog::entity::{AccessLogEntry, ThreatLevel};
use domain::accesslog::error::AccessLogError;
use ports::secondary::access_log_sink::AccessLogSink;

/// Sink that emits one structured log record per ingested entry via
/// `tracing`, tagged `event_type = "access"` so access records are easy
/// to filter in log aggregation.
///
/// Level selection: `error` for high-threat entries, `warn` for medium
/// threat or error status codes, `info` otherwise. The record carries
/// the redacted summary only — the entry reaching the sink no longer
/// holds raw token material.
pub struct TracingAccessLogSink;

impl TracingAccessLogSink {
    fn record_level(entry: &AccessLogEntry) -> tracing::Level {
        match entry.security.threat_level {
            ThreatLevel::High => tracing::Level::ERROR,
            ThreatLevel::Medium => tracing::Level::WARN,
            _ if entry.status_code >= 400 => tracing::Level::WARN,
            _ => tracing::Level::INFO,
        }
    }
}

impl AccessLogSink for TracingAccessLogSink {
    fn write_entry(&self, entry: &AccessLogEntry) -> Result<(), AccessLogError> {
        // tracing macros need a const level, hence the three arms.
        let level = Self::record_level(entry);
        if level == tracing::Level::ERROR {
            tracing::error!(
                event_type = "access",
                id = %entry.id,
                method = %entry.method,
                path = %entry.path,
                status = entry.status_code,
                response_time_ms = entry.response_time_ms,
                client_ip = %entry.client_ip,
                user_agent = %entry.user_agent,
                threat_level = entry.security.threat_level.as_str(),
                success = entry.success,
                "access"
            );
        } else if level == tracing::Level::WARN {
            tracing::warn!(
                event_type = "access",
                id = %entry.id,
                method = %entry.method,
                path = %entry.path,
                status = entry.status_code,
                response_time_ms = entry.response_time_ms,
                client_ip = %entry.client_ip,
                user_agent = %entry.user_agent,
                threat_level = entry.security.threat_level.as_str(),
                success = entry.success,
                "access"
            );
        } else {
            tracing::info!(
                event_type = "access",
                id = %entry.id,
                method = %entry.method,
                path = %entry.path,
                status = entry.status_code,
                response_time_ms = entry.response_time_ms,
                client_ip = %entry.client_ip,
                user_agent = %entry.user_agent,
                threat_level = entry.security.threat_level.as_str(),
                success = entry.success,
                "access"
            );
        }
        Ok(())
    }
}
