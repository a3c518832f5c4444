use crate::ports::RewriteRepository;
use bastion_dns_domain::DomainError;
use std::sync::Arc;

pub struct DeleteRewriteUseCase {
    repository: Arc<dyn RewriteRepository>,
}

impl DeleteRewriteUseCase {
    pub fn new(repository: Arc<dyn RewriteRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, id: i64) -> Result<(), DomainError> {
        self.repository.delete(id).await
    }
}
