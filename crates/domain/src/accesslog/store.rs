use std::collections::VecDeque;
use std::time::Duration;

use super::entity::AccessLogEntry;
use super::query::AccessLogQuery;
use super::stats::AccessLogStats;
use super::suspicious::SuspiciousActivity;
use super::threat::ThreatScorer;

/// Default capacity bound on the entry sequence.
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Default retention window for the TTL sweep.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(24 * 60 * 60);

/// Bounded, self-evicting container of access log entries.
///
/// Entries leave the store two ways: capacity eviction on insert
/// (oldest-first trim so exactly the most recent `max_entries` survive)
/// and the periodic TTL sweep driven by the owning runtime.
///
/// The store is single-writer plain data; callers that share it across
/// threads wrap it in a single exclusive lock (the application service
/// does exactly that).
#[derive(Debug)]
pub struct AccessLogStore {
    entries: VecDeque<AccessLogEntry>,
    max_entries: usize,
    retention: Duration,
}

impl AccessLogStore {
    pub fn new(max_entries: usize, retention: Duration) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries,
            retention,
        }
    }

    /// Append an entry, then trim oldest-first if the capacity bound is
    /// exceeded. This is the single capacity-eviction point.
    pub fn push(&mut self, entry: AccessLogEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    /// Return matching entries in original insertion order.
    pub fn query(&self, query: &AccessLogQuery) -> Vec<AccessLogEntry> {
        self.entries
            .iter()
            .filter(|e| query.matches(e))
            .cloned()
            .collect()
    }

    /// Aggregate statistics over the filtered view.
    pub fn stats(&self, query: &AccessLogQuery, now_ms: u64) -> AccessLogStats {
        let filtered: Vec<&AccessLogEntry> =
            self.entries.iter().filter(|e| query.matches(e)).collect();
        AccessLogStats::compute(&filtered, now_ms)
    }

    /// Security summary over the entire store (never a filtered subset).
    pub fn suspicious_activity(&self, scorer: &ThreatScorer) -> SuspiciousActivity {
        SuspiciousActivity::detect(&self.entries, scorer)
    }

    /// The most recent `count` entries, most-recent-first.
    pub fn recent(&self, count: usize) -> Vec<AccessLogEntry> {
        self.entries.iter().rev().take(count).cloned().collect()
    }

    /// Drop entries that have reached the retention window (only entries
    /// strictly younger than the window survive). Returns the number of
    /// entries removed.
    pub fn sweep_expired(&mut self, now_ms: u64) -> usize {
        #[allow(clippy::cast_possible_truncation)]
        let retention_ms = self.retention.as_millis() as u64;
        let cutoff_ms = now_ms.saturating_sub(retention_ms);

        let before = self.entries.len();
        self.entries.retain(|e| e.timestamp_ms > cutoff_ms);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }
}

impl Default for AccessLogStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES, DEFAULT_RETENTION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accesslog::entity::{PerformanceInfo, SecurityInfo, ThreatLevel};

    fn make_entry(ts: u64, path: &str) -> AccessLogEntry {
        AccessLogEntry {
            id: format!("{ts:x}-{path}"),
            timestamp_ms: ts,
            method: "GET".to_string(),
            path: path.to_string(),
            status_code: 200,
            response_time_ms: 10,
            client_ip: "10.0.0.1".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            referer: None,
            permanent_token: None,
            success: true,
            error: None,
            security: SecurityInfo {
                rate_limited: false,
                security_violation: false,
                threat_level: ThreatLevel::None,
            },
            performance: PerformanceInfo {
                server_processing_ms: 10,
            },
        }
    }

    #[test]
    fn capacity_eviction_keeps_most_recent() {
        let mut store = AccessLogStore::new(100, DEFAULT_RETENTION);
        for i in 0..150u64 {
            store.push(make_entry(i, &format!("/p{i}")));
        }

        assert_eq!(store.len(), 100);
        let survivors = store.query(&AccessLogQuery::default());
        // Exactly the most recent 100, in original relative order.
        assert_eq!(survivors.first().unwrap().timestamp_ms, 50);
        assert_eq!(survivors.last().unwrap().timestamp_ms, 149);
        for pair in survivors.windows(2) {
            assert!(pair[0].timestamp_ms < pair[1].timestamp_ms);
        }
    }

    #[test]
    fn first_entry_is_evicted_after_capacity_more_inserts() {
        let capacity = 50;
        let mut store = AccessLogStore::new(capacity, DEFAULT_RETENTION);
        store.push(make_entry(0, "/a"));
        for i in 1..=capacity as u64 {
            store.push(make_entry(i, "/b"));
        }

        assert_eq!(store.len(), capacity);
        let hits = store.query(&AccessLogQuery {
            path_contains: Some("/a".to_string()),
            ..Default::default()
        });
        assert!(hits.is_empty());
    }

    #[test]
    fn sweep_drops_entries_older_than_retention() {
        let retention = Duration::from_secs(60);
        let mut store = AccessLogStore::new(1_000, retention);
        store.push(make_entry(1_000, "/old"));
        store.push(make_entry(70_000, "/fresh"));

        // At t=120s the first entry is past the 60s window.
        let removed = store.sweep_expired(120_000);
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
        let remaining = store.query(&AccessLogQuery::default());
        assert_eq!(remaining[0].path, "/fresh");
    }

    #[test]
    fn sweep_on_fresh_store_removes_nothing() {
        let mut store = AccessLogStore::new(1_000, DEFAULT_RETENTION);
        store.push(make_entry(1_000, "/a"));
        assert_eq!(store.sweep_expired(2_000), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn sweep_drops_entry_exactly_at_the_window() {
        let retention = Duration::from_secs(60);
        let mut store = AccessLogStore::new(10, retention);
        store.push(make_entry(60_000, "/boundary"));
        store.push(make_entry(60_001, "/inside"));
        // cutoff = 120_000 - 60_000: an entry whose age equals the window
        // is expired, one millisecond younger survives.
        assert_eq!(store.sweep_expired(120_000), 1);
        let remaining = store.query(&AccessLogQuery::default());
        assert_eq!(remaining[0].path, "/inside");
    }

    #[test]
    fn recent_returns_most_recent_first() {
        let mut store = AccessLogStore::default();
        for i in 0..5u64 {
            store.push(make_entry(i, &format!("/p{i}")));
        }
        let recent = store.recent(3);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].timestamp_ms, 4);
        assert_eq!(recent[1].timestamp_ms, 3);
        assert_eq!(recent[2].timestamp_ms, 2);
    }

    #[test]
    fn recent_with_large_count_returns_everything() {
        let mut store = AccessLogStore::default();
        store.push(make_entry(1, "/a"));
        assert_eq!(store.recent(100).len(), 1);
    }

    #[test]
    fn construction_parameters_are_visible() {
        let store = AccessLogStore::new(5, Duration::from_secs(10));
        assert_eq!(store.max_entries(), 5);
        assert_eq!(store.retention(), Duration::from_secs(10));
    }

    #[test]
    fn clear_empties_the_store() {
        let mut store = AccessLogStore::default();
        store.push(make_entry(1, "/a"));
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn stats_on_empty_store_is_zero_struct() {
        let store = AccessLogStore::default();
        let stats = store.stats(&AccessLogQuery::default(), 42);
        assert_eq!(stats.total_requests, 0);
        assert_eq!(stats.time_range.start_ms, 42);
    }

    #[test]
    fn query_preserves_insertion_order() {
        let mut store = AccessLogStore::default();
        store.push(make_entry(30, "/x"));
        store.push(make_entry(10, "/x"));
        store.push(make_entry(20, "/x"));
        let out = store.query(&AccessLogQuery::default());
        // Insertion order, not timestamp order.
        let ts: Vec<u64> = out.iter().map(|e| e.timestamp_ms).collect();
        assert_eq!(ts, vec![30, 10, 20]);
    }
}
