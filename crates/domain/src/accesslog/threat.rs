use regex::{Regex, RegexBuilder};

use super::entity::ThreatLevel;
use super::error::AccessLogError;

/// Maximum compiled regex size (10 MiB).
const REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);
/// Maximum regex nesting depth.
const REGEX_NEST_LIMIT: u32 = 200;

/// Request paths that indicate an attack attempt regardless of outcome:
/// path traversal, inline script injection, SQL union-select probing,
/// and `javascript:` pseudo-URIs.
const SUSPICIOUS_PATH_PATTERNS: [&str; 4] =
    [r"\.\./", r"<script", r"union.*select", r"javascript:"];

/// User agents that identify automated clients.
const BOT_AGENT_PATTERN: &str = r"bot|crawler|spider|scan";

/// Search-engine crawlers that are allow-listed and never flagged as
/// suspicious bots.
const ALLOWED_CRAWLER_PATTERN: &str = r"googlebot|bingbot";

/// An error response slower than this is treated as a resource-pressure
/// signal (possible DoS probing), milliseconds.
const SLOW_ERROR_THRESHOLD_MS: u64 = 10_000;

/// Heuristic threat classifier for a single request.
///
/// All patterns are compiled once at construction (not per-request).
/// Scoring evaluates an ordered rule list top-to-bottom with
/// first-match-wins; the rule order is a behavioral contract, not an
/// optimization.
#[derive(Debug)]
pub struct ThreatScorer {
    suspicious_paths: Vec<Regex>,
    bot_agent: Regex,
    allowed_crawler: Regex,
}

impl ThreatScorer {
    pub fn new() -> Result<Self, AccessLogError> {
        let suspicious_paths = SUSPICIOUS_PATH_PATTERNS
            .iter()
            .map(|p| compile_pattern(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            suspicious_paths,
            bot_agent: compile_pattern(BOT_AGENT_PATTERN)?,
            allowed_crawler: compile_pattern(ALLOWED_CRAWLER_PATTERN)?,
        })
    }

    /// Classify a single request. Pure and deterministic.
    pub fn score(
        &self,
        path: &str,
        user_agent: &str,
        status_code: u16,
        response_time_ms: u64,
    ) -> ThreatLevel {
        let flagged_bot = self.is_flagged_bot(user_agent);
        let error_status = status_code >= 400;

        // Ordered rules, first match wins.
        let rules = [
            (self.is_suspicious_path(path), ThreatLevel::High),
            (flagged_bot && error_status, ThreatLevel::Medium),
            (
                error_status && response_time_ms > SLOW_ERROR_THRESHOLD_MS,
                ThreatLevel::Medium,
            ),
            (flagged_bot || error_status, ThreatLevel::Low),
        ];

        rules
            .iter()
            .find(|(matched, _)| *matched)
            .map_or(ThreatLevel::None, |&(_, level)| level)
    }

    /// Whether the path matches any attack-signature pattern.
    pub fn is_suspicious_path(&self, path: &str) -> bool {
        self.suspicious_paths.iter().any(|re| re.is_match(path))
    }

    /// Bot-like user agent that is not an allow-listed search-engine
    /// crawler. Allow-listed crawlers can still reach `Low` through the
    /// generic error-status rule, never above.
    pub fn is_flagged_bot(&self, user_agent: &str) -> bool {
        self.bot_agent.is_match(user_agent) && !self.allowed_crawler.is_match(user_agent)
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex, AccessLogError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .size_limit(REGEX_SIZE_LIMIT)
        .nest_limit(REGEX_NEST_LIMIT)
        .build()
        .map_err(|e| AccessLogError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })
}
