use crate::ports::RewriteRepository;
use bastion_dns_domain::{DomainError, Rewrite};
use std::sync::Arc;

pub struct GetRewritesUseCase {
    repository: Arc<dyn RewriteRepository>,
}

impl GetRewritesUseCase {
    pub fn new(repository: Arc<dyn RewriteRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self) -> Result<Vec<Rewrite>, DomainError> {
        self.repository.get_all().await
    }
}
