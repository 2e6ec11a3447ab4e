use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::entity::{AccessLogEntry, ThreatLevel};
use super::threat::ThreatScorer;

/// Minimum failure count before an IP is reported as a repeat offender.
const FAILED_IP_THRESHOLD: u64 = 5;

/// Number of entries returned in each ranked list.
const TOP_LIST_LEN: usize = 10;

/// Grouping key length for user-agent anomaly detection. Longer than the
/// stats grouping key on purpose: bot signatures often differ late in the
/// string.
const USER_AGENT_KEY_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpFailureCount {
    pub ip: String,
    pub failures: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAgentRequestCount {
    pub user_agent: String,
    pub requests: u64,
}

/// Security-focused summary derived from the entire store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuspiciousActivity {
    /// Every stored entry classified `High`.
    pub high_threat_requests: Vec<AccessLogEntry>,
    /// IPs with at least [`FAILED_IP_THRESHOLD`] failed requests,
    /// descending by failure count, top 10.
    pub frequent_failed_ips: Vec<IpFailureCount>,
    /// Bot-like, non-allow-listed user agents by request volume,
    /// descending, top 10.
    pub unusual_user_agents: Vec<UserAgentRequestCount>,
}

impl SuspiciousActivity {
    /// Derive the summary from the full entry sequence. Unlike stats,
    /// this never operates on a filtered subset.
    pub fn detect<'a, I>(entries: I, scorer: &ThreatScorer) -> Self
    where
        I: IntoIterator<Item = &'a AccessLogEntry> + Clone,
    {
        let high_threat_requests: Vec<AccessLogEntry> = entries
            .clone()
            .into_iter()
            .filter(|e| e.security.threat_level == ThreatLevel::High)
            .cloned()
            .collect();

        let mut failures_by_ip: HashMap<&str, u64> = HashMap::new();
        let mut requests_by_agent: HashMap<String, u64> = HashMap::new();
        for entry in entries {
            if !entry.success {
                *failures_by_ip.entry(entry.client_ip.as_str()).or_insert(0) += 1;
            }
            let agent_key: String = entry.user_agent.chars().take(USER_AGENT_KEY_LEN).collect();
            *requests_by_agent.entry(agent_key).or_insert(0) += 1;
        }

        let mut frequent_failed_ips: Vec<IpFailureCount> = failures_by_ip
            .into_iter()
            .filter(|&(_, failures)| failures >= FAILED_IP_THRESHOLD)
            .map(|(ip, failures)| IpFailureCount {
                ip: ip.to_string(),
                failures,
            })
            .collect();
        frequent_failed_ips.sort_by(|a, b| b.failures.cmp(&a.failures));
        frequent_failed_ips.truncate(TOP_LIST_LEN);

        let mut unusual_user_agents: Vec<UserAgentRequestCount> = requests_by_agent
            .into_iter()
            .filter(|(agent, _)| scorer.is_flagged_bot(agent))
            .map(|(user_agent, requests)| UserAgentRequestCount {
                user_agent,
                requests,
            })
            .collect();
        unusual_user_agents.sort_by(|a, b| b.requests.cmp(&a.requests));
        unusual_user_agents.truncate(TOP_LIST_LEN);

        Self {
            high_threat_requests,
            frequent_failed_ips,
            unusual_user_agents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accesslog::entity::{PerformanceInfo, SecurityInfo};

    fn make_entry(ip: &str, agent: &str, success: bool, level: ThreatLevel) -> AccessLogEntry {
        AccessLogEntry {
            id: "t-0".to_string(),
            timestamp_ms: 1_000,
            method: "GET".to_string(),
            path: "/jobs".to_string(),
            status_code: if success { 200 } else { 500 },
            response_time_ms: 10,
            client_ip: ip.to_string(),
            user_agent: agent.to_string(),
            referer: None,
            permanent_token: None,
            success,
            error: None,
            security: SecurityInfo {
                rate_limited: false,
                security_violation: false,
                threat_level: level,
            },
            performance: PerformanceInfo {
                server_processing_ms: 10,
            },
        }
    }

    fn scorer() -> ThreatScorer {
        ThreatScorer::new().unwrap()
    }

    #[test]
    fn empty_store_yields_empty_summary() {
        let summary = SuspiciousActivity::detect(&[] as &[AccessLogEntry], &scorer());
        assert!(summary.high_threat_requests.is_empty());
        assert!(summary.frequent_failed_ips.is_empty());
        assert!(summary.unusual_user_agents.is_empty());
    }

    #[test]
    fn collects_high_threat_entries() {
        let entries = vec![
            make_entry("1.1.1.1", "Mozilla/5.0", true, ThreatLevel::High),
            make_entry("2.2.2.2", "Mozilla/5.0", true, ThreatLevel::Medium),
            make_entry("3.3.3.3", "Mozilla/5.0", true, ThreatLevel::High),
        ];
        let summary = SuspiciousActivity::detect(&entries, &scorer());
        assert_eq!(summary.high_threat_requests.len(), 2);
    }

    #[test]
    fn failed_ip_threshold_is_five() {
        let mut entries = Vec::new();
        for _ in 0..5 {
            entries.push(make_entry("1.2.3.4", "Mozilla/5.0", false, ThreatLevel::Low));
        }
        for _ in 0..4 {
            entries.push(make_entry("5.6.7.8", "Mozilla/5.0", false, ThreatLevel::Low));
        }
        let summary = SuspiciousActivity::detect(&entries, &scorer());

        assert_eq!(summary.frequent_failed_ips.len(), 1);
        assert_eq!(summary.frequent_failed_ips[0].ip, "1.2.3.4");
        assert_eq!(summary.frequent_failed_ips[0].failures, 5);
    }

    #[test]
    fn failed_ips_sorted_by_failure_count() {
        let mut entries = Vec::new();
        for _ in 0..6 {
            entries.push(make_entry("1.1.1.1", "ua", false, ThreatLevel::Low));
        }
        for _ in 0..9 {
            entries.push(make_entry("2.2.2.2", "ua", false, ThreatLevel::Low));
        }
        let summary = SuspiciousActivity::detect(&entries, &scorer());
        assert_eq!(summary.frequent_failed_ips[0].ip, "2.2.2.2");
        assert_eq!(summary.frequent_failed_ips[1].ip, "1.1.1.1");
    }

    #[test]
    fn successful_requests_do_not_count_toward_failures() {
        let mut entries = Vec::new();
        for _ in 0..10 {
            entries.push(make_entry("1.1.1.1", "ua", true, ThreatLevel::None));
        }
        let summary = SuspiciousActivity::detect(&entries, &scorer());
        assert!(summary.frequent_failed_ips.is_empty());
    }

    #[test]
    fn flags_bot_agents_but_not_allowed_crawlers() {
        let entries = vec![
            make_entry("1.1.1.1", "EvilScanner-bot/3.0", true, ThreatLevel::Low),
            make_entry("1.1.1.1", "EvilScanner-bot/3.0", false, ThreatLevel::Low),
            make_entry("2.2.2.2", "Googlebot/2.1", true, ThreatLevel::None),
            make_entry("3.3.3.3", "Mozilla/5.0", true, ThreatLevel::None),
        ];
        let summary = SuspiciousActivity::detect(&entries, &scorer());

        assert_eq!(summary.unusual_user_agents.len(), 1);
        assert_eq!(summary.unusual_user_agents[0].user_agent, "EvilScanner-bot/3.0");
        assert_eq!(summary.unusual_user_agents[0].requests, 2);
    }

    #[test]
    fn agents_group_by_100_char_prefix() {
        let long_a = format!("scan-{}-one", "x".repeat(100));
        let long_b = format!("scan-{}-two", "x".repeat(100));
        let entries = vec![
            make_entry("1.1.1.1", &long_a, true, ThreatLevel::Low),
            make_entry("1.1.1.1", &long_b, true, ThreatLevel::Low),
        ];
        let summary = SuspiciousActivity::detect(&entries, &scorer());

        // Identical after truncation to 100 chars, so a single group.
        assert_eq!(summary.unusual_user_agents.len(), 1);
        assert_eq!(summary.unusual_user_agents[0].requests, 2);
    }
}
