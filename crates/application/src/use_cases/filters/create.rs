use crate::ports::CustomFilterRepository;
use bastion_dns_domain::validators::{normalize_and_validate_domain, validate_comment};
use bastion_dns_domain::{CustomFilter, DomainError, FilterKind};
use std::sync::Arc;
use tracing::info;

pub struct CreateFilterUseCase {
    repository: Arc<dyn CustomFilterRepository>,
}

impl CreateFilterUseCase {
    pub fn new(repository: Arc<dyn CustomFilterRepository>) -> Self {
        Self { repository }
    }

    /// Normalizes and validates the domain before anything is persisted.
    pub async fn execute(
        &self,
        domain: &str,
        kind: &str,
        comment: Option<String>,
    ) -> Result<CustomFilter, DomainError> {
        let domain = normalize_and_validate_domain(domain, false)?;
        let kind: FilterKind = kind.parse().map_err(DomainError::InvalidInput)?;
        validate_comment(comment.as_deref()).map_err(DomainError::InvalidInput)?;

        let filter = CustomFilter::new(
            Arc::from(domain.as_str()),
            kind,
            comment.map(|c| Arc::from(c.as_str())),
        );
        let created = self.repository.create(filter).await?;

        info!(domain = %created.domain, kind = %created.kind, "Custom filter created");
        Ok(created)
    }
}
