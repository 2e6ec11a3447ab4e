use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::entity::{AccessLogEntry, ThreatLevel};

/// Number of entries returned in the `top_paths` / `top_user_agents` lists.
const TOP_LIST_LEN: usize = 10;

/// Grouping key length for `top_user_agents`. Two agents differing only
/// beyond this length collide — an intentional, documented precision loss.
const USER_AGENT_KEY_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathCount {
    pub path: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAgentCount {
    pub user_agent: String,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    pub start_ms: u64,
    pub end_ms: u64,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySummary {
    pub rate_limited_requests: u64,
    pub security_violations: u64,
    pub threat_levels: HashMap<ThreatLevel, u64>,
}

/// Aggregate statistics over a filtered view of the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessLogStats {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub average_response_time_ms: f64,
    pub unique_ips: u64,
    pub top_paths: Vec<PathCount>,
    pub top_user_agents: Vec<UserAgentCount>,
    pub status_codes: HashMap<u16, u64>,
    pub time_range: TimeRange,
    pub security: SecuritySummary,
}

impl AccessLogStats {
    /// Compute statistics over `entries`.
    ///
    /// An empty input yields a fully-populated zero-value struct
    /// (`start = end = now_ms`, empty lists and histograms) rather than
    /// an error or a sentinel — callers never see a missing stats object.
    ///
    /// The relative order of equal-count items inside the top lists is
    /// unspecified: the stable sort preserves frequency-map iteration
    /// order, which is itself arbitrary.
    #[allow(clippy::cast_precision_loss)]
    pub fn compute(entries: &[&AccessLogEntry], now_ms: u64) -> Self {
        if entries.is_empty() {
            return Self::empty(now_ms);
        }

        let total = entries.len() as u64;
        let successful = entries.iter().filter(|e| e.success).count() as u64;

        let response_time_sum: u64 = entries.iter().map(|e| e.response_time_ms).sum();
        let average_response_time_ms = response_time_sum as f64 / total as f64;

        let unique_ips = entries
            .iter()
            .map(|e| e.client_ip.as_str())
            .collect::<std::collections::HashSet<_>>()
            .len() as u64;

        let mut path_counts: HashMap<&str, u64> = HashMap::new();
        let mut agent_counts: HashMap<String, u64> = HashMap::new();
        let mut status_codes: HashMap<u16, u64> = HashMap::new();
        let mut threat_levels: HashMap<ThreatLevel, u64> = HashMap::new();
        let mut rate_limited = 0u64;
        let mut violations = 0u64;
        let mut start_ms = u64::MAX;
        let mut end_ms = 0u64;

        for entry in entries {
            *path_counts.entry(entry.path.as_str()).or_insert(0) += 1;
            let agent_key: String = entry.user_agent.chars().take(USER_AGENT_KEY_LEN).collect();
            *agent_counts.entry(agent_key).or_insert(0) += 1;
            *status_codes.entry(entry.status_code).or_insert(0) += 1;
            *threat_levels.entry(entry.security.threat_level).or_insert(0) += 1;
            if entry.security.rate_limited {
                rate_limited += 1;
            }
            if entry.security.security_violation {
                violations += 1;
            }
            start_ms = start_ms.min(entry.timestamp_ms);
            end_ms = end_ms.max(entry.timestamp_ms);
        }

        let mut top_paths: Vec<PathCount> = path_counts
            .into_iter()
            .map(|(path, count)| PathCount {
                path: path.to_string(),
                count,
            })
            .collect();
        top_paths.sort_by(|a, b| b.count.cmp(&a.count));
        top_paths.truncate(TOP_LIST_LEN);

        let mut top_user_agents: Vec<UserAgentCount> = agent_counts
            .into_iter()
            .map(|(user_agent, count)| UserAgentCount { user_agent, count })
            .collect();
        top_user_agents.sort_by(|a, b| b.count.cmp(&a.count));
        top_user_agents.truncate(TOP_LIST_LEN);

        Self {
            total_requests: total,
            successful_requests: successful,
            failed_requests: total - successful,
            average_response_time_ms,
            unique_ips,
            top_paths,
            top_user_agents,
            status_codes,
            time_range: TimeRange {
                start_ms,
                end_ms,
                duration_ms: end_ms - start_ms,
            },
            security: SecuritySummary {
                rate_limited_requests: rate_limited,
                security_violations: violations,
                threat_levels,
            },
        }
    }

    /// Zero-value stats for an empty entry set.
    pub fn empty(now_ms: u64) -> Self {
        Self {
            total_requests: 0,
            successful_requests: 0,
            failed_requests: 0,
            average_response_time_ms: 0.0,
            unique_ips: 0,
            top_paths: Vec::new(),
            top_user_agents: Vec::new(),
            status_codes: HashMap::new(),
            time_range: TimeRange {
                start_ms: now_ms,
                end_ms: now_ms,
                duration_ms: 0,
            },
            security: SecuritySummary {
                rate_limited_requests: 0,
                security_violations: 0,
                threat_levels: HashMap::new(),
            },
        }
    }
}
