use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use domain::accesslog::entity::{
    AccessLogEntry, PerformanceInfo, SecurityInfo, current_timestamp_ms, generate_entry_id,
    redact_token,
};
use domain::accesslog::error::AccessLogError;
use domain::accesslog::query::AccessLogQuery;
use domain::accesslog::stats::AccessLogStats;
use domain::accesslog::store::AccessLogStore;
use domain::accesslog::suspicious::SuspiciousActivity;
use domain::accesslog::threat::ThreatScorer;
use ports::secondary::access_log_sink::AccessLogSink;

/// Default entry count for [`AccessLogService::recent`].
pub const DEFAULT_RECENT_COUNT: usize = 100;

/// Request telemetry supplied by the hosting application's request layer,
/// one per observed request.
#[derive(Debug, Clone, Default)]
pub struct AccessLogRequest {
    pub method: String,
    pub path: String,
    pub status_code: u16,
    pub response_time_ms: u64,
    pub client_ip: String,
    pub user_agent: String,
    pub referer: Option<String>,
    /// Raw token. Redacted before the entry is constructed; the full
    /// value is never stored or logged.
    pub permanent_token: Option<String>,
    pub success: bool,
    pub error: Option<String>,
    pub rate_limited: bool,
    pub security_violation: bool,
}

/// Application-layer access log service: ingest, queries, statistics,
/// suspicious-activity summaries, and the export/maintenance surface.
///
/// The store sits behind a single exclusive lock; ingest, readers, and
/// the TTL sweeper all contend on it, which is fine at the operation
/// costs involved. No operation errors on expected input: sink failures
/// are logged and swallowed, a poisoned lock degrades to no-ops and
/// empty results.
pub struct AccessLogService {
    store: Mutex<AccessLogStore>,
    scorer: ThreatScorer,
    sink: Arc<dyn AccessLogSink>,
}

impl AccessLogService {
    pub fn new(
        max_entries: usize,
        retention: Duration,
        sink: Arc<dyn AccessLogSink>,
    ) -> Result<Self, AccessLogError> {
        Ok(Self {
            store: Mutex::new(AccessLogStore::new(max_entries, retention)),
            scorer: ThreatScorer::new()?,
            sink,
        })
    }

    /// Record one observed request.
    ///
    /// Builds the immutable entry (redaction, threat scoring, id and
    /// timestamp assignment), emits it through the sink, and appends it
    /// to the store. Never fails the caller: logging must not block the
    /// request path it instruments.
    pub fn log_access(&self, request: AccessLogRequest) {
        let entry = self.build_entry(request);

        if let Err(e) = self.sink.write_entry(&entry) {
            tracing::warn!(error = %e, "access log sink write failed");
        }

        match self.store.lock() {
            Ok(mut store) => store.push(entry),
            Err(_) => tracing::warn!("access log store lock poisoned, entry dropped"),
        }
    }

    /// Entries matching the filter, in insertion order.
    pub fn logs(&self, query: &AccessLogQuery) -> Vec<AccessLogEntry> {
        self.read_store().map_or_else(Vec::new, |s| s.query(query))
    }

    /// Aggregate statistics over the filtered view. An empty view yields
    /// the zero-value struct, never an error.
    pub fn stats(&self, query: &AccessLogQuery) -> AccessLogStats {
        let now_ms = current_timestamp_ms();
        self.read_store()
            .map_or_else(|| AccessLogStats::empty(now_ms), |s| s.stats(query, now_ms))
    }

    /// The most recent `count` entries, most-recent-first.
    pub fn recent(&self, count: usize) -> Vec<AccessLogEntry> {
        self.read_store().map_or_else(Vec::new, |s| s.recent(count))
    }

    /// Security summary over the entire store.
    pub fn suspicious_activity(&self) -> SuspiciousActivity {
        self.read_store().map_or_else(
            || SuspiciousActivity::detect(&[] as &[AccessLogEntry], &self.scorer),
            |s| s.suspicious_activity(&self.scorer),
        )
    }

    /// Matching entries as a pretty-printed JSON array.
    pub fn export_json(&self, query: &AccessLogQuery) -> Result<String, AccessLogError> {
        let entries = self.logs(query);
        serde_json::to_string_pretty(&entries)
            .map_err(|e| AccessLogError::ExportFailed(e.to_string()))
    }

    /// Drop entries older than the retention window. Returns the number
    /// removed. Called by the periodic sweeper, callable directly.
    pub fn sweep_expired(&self) -> usize {
        let now_ms = current_timestamp_ms();
        match self.store.lock() {
            Ok(mut store) => {
                let removed = store.sweep_expired(now_ms);
                if removed > 0 {
                    tracing::info!(removed, "expired access log entries swept");
                }
                removed
            }
            Err(_) => {
                tracing::warn!("access log store lock poisoned, sweep skipped");
                0
            }
        }
    }

    pub fn clear(&self) {
        if let Ok(mut store) = self.store.lock() {
            store.clear();
        }
    }

    pub fn size(&self) -> usize {
        self.read_store().map_or(0, |s| s.len())
    }

    fn build_entry(&self, request: AccessLogRequest) -> AccessLogEntry {
        let timestamp_ms = current_timestamp_ms();
        let threat_level = self.scorer.score(
            &request.path,
            &request.user_agent,
            request.status_code,
            request.response_time_ms,
        );

        AccessLogEntry {
            id: generate_entry_id(timestamp_ms),
            timestamp_ms,
            method: request.method,
            path: request.path,
            status_code: request.status_code,
            response_time_ms: request.response_time_ms,
            client_ip: request.client_ip,
            user_agent: request.user_agent,
            referer: request.referer,
            permanent_token: request.permanent_token.as_deref().map(redact_token),
            success: request.success,
            error: request.error,
            security: SecurityInfo {
                rate_limited: request.rate_limited,
                security_violation: request.security_violation,
                threat_level,
            },
            performance: PerformanceInfo {
                server_processing_ms: request.response_time_ms,
            },
        }
    }

    fn read_store(&self) -> Option<MutexGuard<'_, AccessLogStore>> {
        match self.store.lock() {
            Ok(guard) => Some(guard),
            Err(_) => {
                tracing::warn!("access log store lock poisoned, returning empty view");
                None
            }
        }
    }
}
