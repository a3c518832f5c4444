use bastion_dns_application::ports::ConfigObserver;
use bastion_dns_application::use_cases::CleanupOldQueryLogsUseCase;
use bastion_dns_domain::Config;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

const DAY_SECS: u64 = 24 * 60 * 60;

/// Retention window in days, shared between the job and the config update
/// path so a new `log_retention_days` applies from the next run.
#[derive(Clone)]
pub struct RetentionWindow(Arc<AtomicU32>);

impl RetentionWindow {
    pub fn new(days: u32) -> Self {
        Self(Arc::new(AtomicU32::new(days)))
    }

    pub fn days(&self) -> u32 {
        self.0.load(Ordering::Relaxed)
    }
}

impl ConfigObserver for RetentionWindow {
    fn config_changed(&self, config: &Config) {
        let days = config.database.log_retention_days;
        if self.0.swap(days, Ordering::Relaxed) != days {
            debug!(days, "Query log retention window updated");
        }
    }
}

/// Purges query log rows older than the retention window. Runs once at
/// start, then every `interval_secs` (a day unless overridden).
pub struct QueryLogRetentionJob {
    cleanup: Arc<CleanupOldQueryLogsUseCase>,
    window: RetentionWindow,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl QueryLogRetentionJob {
    pub fn new(cleanup: Arc<CleanupOldQueryLogsUseCase>, retention_days: u32) -> Self {
        Self {
            cleanup,
            window: RetentionWindow::new(retention_days),
            interval_secs: DAY_SECS,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs.max(1);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Handle to register with the config update path.
    pub fn window(&self) -> RetentionWindow {
        self.window.clone()
    }

    async fn purge(&self) {
        let days = self.window.days();
        match self.cleanup.execute(days).await {
            Ok(0) => debug!(days, "No query log entries past retention"),
            Ok(deleted) => info!(deleted, days, "Old query log entries purged"),
            Err(e) => error!(error = %e, "Query log purge failed"),
        }
    }

    pub async fn start(self: Arc<Self>) {
        info!(
            retention_days = self.window.days(),
            interval_secs = self.interval_secs,
            "Query log retention job scheduled"
        );

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(self.interval_secs));
            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        debug!("Query log retention job stopped");
                        return;
                    }
                    _ = ticker.tick() => self.purge().await,
                }
            }
        });
    }
}
