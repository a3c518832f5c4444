use async_trait::async_trait;
use bastion_dns_domain::{BlocklistRefresh, BlocklistSource, DomainError};

/// Repository interface for blocklist subscriptions and their downloaded
/// domains.
#[async_trait]
pub trait BlocklistRepository: Send + Sync {
    /// Persists a new subscription.
    ///
    /// # Errors
    ///
    /// * `DomainError::Conflict` - If a subscription with this URL already exists
    /// * `DomainError::DatabaseError` - If a database error occurs
    async fn create(&self, source: BlocklistSource) -> Result<BlocklistSource, DomainError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<BlocklistSource>, DomainError>;

    async fn get_all(&self) -> Result<Vec<BlocklistSource>, DomainError>;

    async fn get_enabled(&self) -> Result<Vec<BlocklistSource>, DomainError>;

    /// Updates name, URL, format and enabled flag of an existing subscription.
    ///
    /// # Errors
    ///
    /// * `DomainError::NotFound` - If `source.id` does not exist
    async fn update(&self, source: BlocklistSource) -> Result<BlocklistSource, DomainError>;

    /// Deletes a subscription and its stored domains.
    ///
    /// # Errors
    ///
    /// * `DomainError::NotFound` - If no subscription with this ID exists
    async fn delete(&self, id: i64) -> Result<(), DomainError>;

    /// Replaces every stored domain of `source_id` in one transaction.
    async fn replace_domains(&self, source_id: i64, domains: &[String])
        -> Result<(), DomainError>;

    /// Records the outcome of a refresh attempt (count, error, timestamp).
    async fn record_refresh(&self, refresh: &BlocklistRefresh) -> Result<(), DomainError>;

    /// Distinct domains stored for all enabled subscriptions.
    async fn enabled_domains(&self) -> Result<Vec<String>, DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}
