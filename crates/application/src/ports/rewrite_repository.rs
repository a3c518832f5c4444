use async_trait::async_trait;
use bastion_dns_domain::{DomainError, Rewrite};

#[async_trait]
pub trait RewriteRepository: Send + Sync {
    /// # Errors
    ///
    /// * `DomainError::Conflict` - If a rewrite for the same domain and type exists
    async fn create(&self, rewrite: Rewrite) -> Result<Rewrite, DomainError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Rewrite>, DomainError>;

    async fn get_all(&self) -> Result<Vec<Rewrite>, DomainError>;

    async fn get_enabled(&self) -> Result<Vec<Rewrite>, DomainError>;

    /// # Errors
    ///
    /// * `DomainError::NotFound` - If `rewrite.id` does not exist
    async fn update(&self, rewrite: Rewrite) -> Result<Rewrite, DomainError>;

    async fn delete(&self, id: i64) -> Result<(), DomainError>;
}
