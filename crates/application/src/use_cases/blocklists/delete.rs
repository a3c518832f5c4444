use crate::ports::BlocklistRepository;
use bastion_dns_domain::DomainError;
use std::sync::Arc;

pub struct DeleteBlocklistUseCase {
    repository: Arc<dyn BlocklistRepository>,
}

impl DeleteBlocklistUseCase {
    pub fn new(repository: Arc<dyn BlocklistRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, id: i64) -> Result<(), DomainError> {
        self.repository.delete(id).await
    }
}
