use crate::ports::BlocklistRepository;
use bastion_dns_domain::{BlocklistSource, DomainError, ListFormat, DEFAULT_BLOCKLISTS};
use std::sync::Arc;
use tracing::info;

/// Inserts the default subscriptions when the store has none.
pub struct SeedDefaultBlocklistsUseCase {
    repository: Arc<dyn BlocklistRepository>,
}

impl SeedDefaultBlocklistsUseCase {
    pub fn new(repository: Arc<dyn BlocklistRepository>) -> Self {
        Self { repository }
    }

    /// Returns the number of subscriptions created.
    pub async fn execute(&self) -> Result<usize, DomainError> {
        if self.repository.count().await? > 0 {
            return Ok(0);
        }

        for (name, url) in DEFAULT_BLOCKLISTS {
            self.repository
                .create(BlocklistSource::new(
                    Arc::from(*name),
                    Arc::from(*url),
                    ListFormat::Auto,
                    true,
                ))
                .await?;
        }

        info!(count = DEFAULT_BLOCKLISTS.len(), "Default blocklists seeded");
        Ok(DEFAULT_BLOCKLISTS.len())
    }
}
