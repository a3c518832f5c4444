use async_trait::async_trait;
use bastion_dns_domain::{BlocklistSource, DomainError};

/// Downloads a blocklist and returns its normalized domains.
#[async_trait]
pub trait BlocklistFetcher: Send + Sync {
    async fn fetch(&self, source: &BlocklistSource) -> Result<Vec<String>, DomainError>;
}
