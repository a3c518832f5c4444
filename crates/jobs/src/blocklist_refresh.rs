use bastion_dns_application::use_cases::RefreshBlocklistsUseCase;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Periodically downloads every enabled blocklist and reloads the filters.
///
/// The first refresh happens one interval after start; the startup refresh
/// is run by the caller.
pub struct BlocklistRefreshJob {
    refresh: Arc<RefreshBlocklistsUseCase>,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl BlocklistRefreshJob {
    pub fn new(refresh: Arc<RefreshBlocklistsUseCase>) -> Self {
        Self {
            refresh,
            interval_secs: 3600,
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

    pub async fn start(self: Arc<Self>) {
        info!(
            interval_secs = self.interval_secs,
            "Starting blocklist refresh job"
        );

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("BlocklistRefreshJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        match self.refresh.execute().await {
                            Ok(summary) => info!(
                                refreshed = summary.refreshed,
                                failed = summary.failed,
                                domains = summary.total_domains,
                                "BlocklistRefreshJob: refresh completed"
                            ),
                            Err(e) => error!(error = %e, "BlocklistRefreshJob: refresh failed"),
                        }
                    }
                }
            }
        });
    }
}
