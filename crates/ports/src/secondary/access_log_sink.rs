use domain::accesslog::entity::AccessLogEntry;
use domain::accesslog::error::AccessLogError;

/// Pluggable per-entry output for ingested access log entries.
///
/// The console adapter emits one leveled structured record per entry.
/// Forwarding to an external log backend is a future implementation of
/// this trait; no such adapter exists today. Sink failures never reach
/// the request path — the service logs and swallows them.
///
/// Entries handed to a sink are already redacted; implementations must
/// not attempt to recover or log raw token material.
pub trait AccessLogSink: Send + Sync {
    /// Emit a single entry.
    fn write_entry(&self, entry: &AccessLogEntry) -> Result<(), AccessLogError>;
}
