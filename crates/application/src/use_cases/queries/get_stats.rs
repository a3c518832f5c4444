use crate::ports::{LiveStatsPort, QueryLogRepository};
use bastion_dns_domain::{DomainError, RealtimeStats};
use std::sync::Arc;

const TOP_DOMAINS: u32 = 20;

pub struct GetRealtimeStatsUseCase {
    live: Arc<dyn LiveStatsPort>,
    query_log: Arc<dyn QueryLogRepository>,
}

impl GetRealtimeStatsUseCase {
    pub fn new(live: Arc<dyn LiveStatsPort>, query_log: Arc<dyn QueryLogRepository>) -> Self {
        Self { live, query_log }
    }

    pub async fn execute(&self) -> Result<RealtimeStats, DomainError> {
        let mut live = self.live.counters();
        live.dropped_log_entries = self.query_log.dropped_entries();
        let summary = self.query_log.summary(TOP_DOMAINS).await?;
        let queries_per_minute = summary.queries_last_5m as f64 / 5.0;

        Ok(RealtimeStats {
            live,
            summary,
            queries_per_minute,
        })
    }
}
