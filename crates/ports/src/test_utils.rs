use std::sync::atomic::{AtomicU32, Ordering};

use domain::accesslog::entity::AccessLogEntry;
use domain::accesslog::error::AccessLogError;

use crate::secondary::access_log_sink::AccessLogSink;

/// Sink that discards every entry, for tests that only exercise the store.
pub struct NoopSink;

impl AccessLogSink for NoopSink {
    fn write_entry(&self, _entry: &AccessLogEntry) -> Result<(), AccessLogError> {
        Ok(())
    }
}

/// Sink that counts writes, for asserting ingest behavior.
#[derive(Default)]
pub struct CountingSink {
    writes: AtomicU32,
}

impl CountingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> u32 {
        self.writes.load(Ordering::Relaxed)
    }
}

impl AccessLogSink for CountingSink {
    fn write_entry(&self, _entry: &AccessLogEntry) -> Result<(), AccessLogError> {
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// Sink that always fails, for asserting that ingest never propagates
/// sink errors.
pub struct FailingSink;

impl AccessLogSink for FailingSink {
    fn write_entry(&self, _entry: &AccessLogEntry) -> Result<(), AccessLogError> {
        Err(AccessLogError::SinkWriteFailed("sink closed".to_string()))
    }
}
