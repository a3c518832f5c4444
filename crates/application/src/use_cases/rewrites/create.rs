use crate::ports::RewriteRepository;
use bastion_dns_domain::validators::{normalize_and_validate_domain, validate_comment};
use bastion_dns_domain::{DomainError, Rewrite, RewriteType};
use std::sync::Arc;
use tracing::info;

pub struct CreateRewriteUseCase {
    repository: Arc<dyn RewriteRepository>,
}

impl CreateRewriteUseCase {
    pub fn new(repository: Arc<dyn RewriteRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(
        &self,
        domain: &str,
        record_type: &str,
        answer: &str,
        enabled: Option<bool>,
        comment: Option<String>,
    ) -> Result<Rewrite, DomainError> {
        let domain = normalize_and_validate_domain(domain, true)?;
        let record_type: RewriteType = record_type
            .parse()
            .map_err(DomainError::InvalidRecordType)?;
        let answer =
            Rewrite::validate_answer(record_type, answer).map_err(DomainError::InvalidInput)?;
        validate_comment(comment.as_deref()).map_err(DomainError::InvalidInput)?;

        let rewrite = Rewrite::new(
            Arc::from(domain.as_str()),
            record_type,
            Arc::from(answer.as_str()),
            enabled.unwrap_or(true),
            comment.map(|c| Arc::from(c.as_str())),
        );
        let created = self.repository.create(rewrite).await?;

        info!(domain = %created.domain, record_type = %created.record_type, answer = %created.answer, "Rewrite created");
        Ok(created)
    }
}
