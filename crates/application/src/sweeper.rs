use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use domain::accesslog::error::AccessLogError;
use ports::secondary::access_log_sink::AccessLogSink;

use crate::access_log_service::AccessLogService;

/// Default interval between TTL sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Run the periodic TTL sweep until the token is cancelled.
///
/// The first immediate interval tick is skipped; sweeps then run at a
/// fixed cadence independent of ingest volume.
pub async fn run_sweeper(
    service: Arc<AccessLogService>,
    interval: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.tick().await; // the first tick completes immediately
    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }
        service.sweep_expired();
    }
    tracing::debug!("access log sweeper stopped");
}

/// Owning handle for the access log engine: the service plus its
/// background sweep task.
///
/// Constructed once by the hosting application and shared by reference
/// (the store lives in one process; multiple replicas each see only
/// their own traffic). [`AccessLogRuntime::shutdown`] is the teardown
/// point: it cancels the sweeper, waits for it to exit, and clears the
/// store. Idempotent — calling it again is a no-op.
pub struct AccessLogRuntime {
    service: Arc<AccessLogService>,
    cancel: CancellationToken,
    sweeper: Option<JoinHandle<()>>,
}

impl AccessLogRuntime {
    /// Build the service and spawn the sweep task.
    pub fn start(
        max_entries: usize,
        retention: Duration,
        sweep_interval: Duration,
        sink: Arc<dyn AccessLogSink>,
    ) -> Result<Self, AccessLogError> {
        let service = Arc::new(AccessLogService::new(max_entries, retention, sink)?);
        let cancel = CancellationToken::new();

        tracing::info!(
            max_entries,
            retention_secs = retention.as_secs(),
            sweep_interval_secs = sweep_interval.as_secs(),
            "access log engine starting"
        );

        let sweeper = tokio::spawn(run_sweeper(
            Arc::clone(&service),
            sweep_interval,
            cancel.clone(),
        ));

        Ok(Self {
            service,
            cancel,
            sweeper: Some(sweeper),
        })
    }

    /// The shared service handle callers use for ingest and queries.
    pub fn service(&self) -> Arc<AccessLogService> {
        Arc::clone(&self.service)
    }

    /// Cancel the sweeper, wait for it to exit, and clear the store.
    ///
    /// Safe to call more than once and safe to call while a sweep is in
    /// flight: cancellation is level-triggered and the join handle is
    /// only awaited the first time.
    pub async fn shutdown(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.sweeper.take() {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "access log sweeper task failed");
            }
            self.service.clear();
            tracing::info!("access log engine stopped");
        }
    }
}

impl Drop for AccessLogRuntime {
    fn drop(&mut self) {
        // Last-resort cancellation if the owner never called shutdown();
        // the task notices on its next select round.
        self.cancel.cancel();
    }
}
