use crate::ports::CustomFilterRepository;
use bastion_dns_domain::{CustomFilter, DomainError, FilterKind};
use std::sync::Arc;

pub struct GetFiltersUseCase {
    repository: Arc<dyn CustomFilterRepository>,
}

impl GetFiltersUseCase {
    pub fn new(repository: Arc<dyn CustomFilterRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, kind: Option<FilterKind>) -> Result<Vec<CustomFilter>, DomainError> {
        match kind {
            Some(kind) => self.repository.get_by_kind(kind).await,
            None => self.repository.get_all().await,
        }
    }
}
