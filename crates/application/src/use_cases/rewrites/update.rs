use crate::ports::RewriteRepository;
use bastion_dns_domain::validators::{normalize_and_validate_domain, validate_comment};
use bastion_dns_domain::{DomainError, Rewrite, RewriteType};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct RewriteChanges {
    pub domain: Option<String>,
    pub record_type: Option<String>,
    pub answer: Option<String>,
    pub enabled: Option<bool>,
    pub comment: Option<String>,
}

pub struct UpdateRewriteUseCase {
    repository: Arc<dyn RewriteRepository>,
}

impl UpdateRewriteUseCase {
    pub fn new(repository: Arc<dyn RewriteRepository>) -> Self {
        Self { repository }
    }

    /// Merges `changes` into the stored row and validates the result as a
    /// whole, so changing only the type still re-checks the answer.
    pub async fn execute(&self, id: i64, changes: RewriteChanges) -> Result<Rewrite, DomainError> {
        let mut rewrite = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Rewrite {} not found", id)))?;

        if let Some(domain) = changes.domain {
            rewrite.domain = Arc::from(normalize_and_validate_domain(&domain, true)?.as_str());
        }
        if let Some(record_type) = changes.record_type {
            rewrite.record_type = record_type
                .parse::<RewriteType>()
                .map_err(DomainError::InvalidRecordType)?;
        }
        let answer = changes.answer.unwrap_or_else(|| rewrite.answer.to_string());
        rewrite.answer = Arc::from(
            Rewrite::validate_answer(rewrite.record_type, &answer)
                .map_err(DomainError::InvalidInput)?
                .as_str(),
        );
        if let Some(enabled) = changes.enabled {
            rewrite.enabled = enabled;
        }
        if let Some(comment) = changes.comment {
            validate_comment(Some(&comment)).map_err(DomainError::InvalidInput)?;
            rewrite.comment = Some(Arc::from(comment.as_str()));
        }

        self.repository.update(rewrite).await
    }
}
