use async_trait::async_trait;
use bastion_dns_domain::{CustomFilter, DomainError, FilterKind};

/// Repository interface for global blacklist/whitelist entries.
///
/// Domains are expected to be normalized by the caller.
#[async_trait]
pub trait CustomFilterRepository: Send + Sync {
    /// # Errors
    ///
    /// * `DomainError::Conflict` - If the same `(domain, kind)` already exists
    async fn create(&self, filter: CustomFilter) -> Result<CustomFilter, DomainError>;

    async fn get_all(&self) -> Result<Vec<CustomFilter>, DomainError>;

    async fn get_by_kind(&self, kind: FilterKind) -> Result<Vec<CustomFilter>, DomainError>;

    /// # Errors
    ///
    /// * `DomainError::NotFound` - If no filter with this ID exists
    async fn delete(&self, id: i64) -> Result<(), DomainError>;

    /// Deletes every filter with this domain and kind, returning how many.
    async fn delete_by_domain(&self, domain: &str, kind: FilterKind) -> Result<u64, DomainError>;
}
