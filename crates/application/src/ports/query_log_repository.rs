use async_trait::async_trait;
use bastion_dns_domain::{ClientActivity, DomainError, QueryLogEntry, QueryLogPage, QueryLogSummary};

#[async_trait]
pub trait QueryLogRepository: Send + Sync {
    /// Enqueue an entry for persistence.
    ///
    /// Must never wait on storage: implementations drop the entry when their
    /// queue is full and count the drop.
    fn log_query(&self, entry: QueryLogEntry);

    /// Entries dropped because the queue was full.
    fn dropped_entries(&self) -> u64 {
        0
    }

    /// One page of entries, newest first. `page` starts at 1.
    async fn get_page(&self, page: u32, limit: u32) -> Result<QueryLogPage, DomainError>;

    /// Aggregates over the recent log; `top_n` bounds the top-domain lists.
    async fn summary(&self, top_n: u32) -> Result<QueryLogSummary, DomainError>;

    /// Per-client query/blocked counts and last-seen time, busiest first.
    async fn client_activity(&self, limit: u32) -> Result<Vec<ClientActivity>, DomainError>;

    /// Deletes entries older than `days`, returning how many were removed.
    async fn delete_older_than(&self, days: u32) -> Result<u64, DomainError>;
}
