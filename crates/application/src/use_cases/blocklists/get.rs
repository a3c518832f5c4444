use crate::ports::BlocklistRepository;
use bastion_dns_domain::{BlocklistSource, DomainError};
use std::sync::Arc;

pub struct GetBlocklistsUseCase {
    repository: Arc<dyn BlocklistRepository>,
}

impl GetBlocklistsUseCase {
    pub fn new(repository: Arc<dyn BlocklistRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self) -> Result<Vec<BlocklistSource>, DomainError> {
        self.repository.get_all().await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<BlocklistSource>, DomainError> {
        self.repository.get_by_id(id).await
    }
}
