use crate::ports::CustomFilterRepository;
use bastion_dns_domain::validators::normalize_and_validate_domain;
use bastion_dns_domain::{DomainError, FilterKind};
use std::sync::Arc;

pub struct DeleteFilterUseCase {
    repository: Arc<dyn CustomFilterRepository>,
}

impl DeleteFilterUseCase {
    pub fn new(repository: Arc<dyn CustomFilterRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, id: i64) -> Result<(), DomainError> {
        self.repository.delete(id).await
    }

    /// Deletes by `(domain, kind)`; the domain is normalized first.
    pub async fn execute_by_domain(&self, domain: &str, kind: &str) -> Result<u64, DomainError> {
        let domain = normalize_and_validate_domain(domain, false)?;
        let kind: FilterKind = kind.parse().map_err(DomainError::InvalidInput)?;
        self.repository.delete_by_domain(&domain, kind).await
    }
}
