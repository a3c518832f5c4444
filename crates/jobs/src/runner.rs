use crate::{BlocklistRefreshJob, QueryLogRetentionJob};
use std::sync::Arc;
use tracing::info;

/// Central orchestrator for all background jobs.
///
/// Use the builder pattern to register jobs, then call `.start()` once.
///
/// # Example
///
/// ```rust,ignore
/// JobRunner::new()
///     .with_blocklist_refresh(BlocklistRefreshJob::new(refresh).with_interval(3600))
///     .with_query_log_retention(QueryLogRetentionJob::new(cleanup, 7))
///     .start()
///     .await;
/// ```
pub struct JobRunner {
    blocklist_refresh: Option<BlocklistRefreshJob>,
    query_log_retention: Option<QueryLogRetentionJob>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self {
            blocklist_refresh: None,
            query_log_retention: None,
        }
    }

    pub fn with_blocklist_refresh(mut self, job: BlocklistRefreshJob) -> Self {
        self.blocklist_refresh = Some(job);
        self
    }

    pub fn with_query_log_retention(mut self, job: QueryLogRetentionJob) -> Self {
        self.query_log_retention = Some(job);
        self
    }

    /// Start all registered background jobs.
    pub async fn start(self) {
        info!("Starting background job runner");

        if let Some(job) = self.blocklist_refresh {
            Arc::new(job).start().await;
        }

        if let Some(job) = self.query_log_retention {
            Arc::new(job).start().await;
        }

        info!("All background jobs started");
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}
