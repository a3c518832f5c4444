use crate::ports::ClientRuleRepository;
use bastion_dns_domain::validators::{
    normalize_and_validate_domain, parse_client_ip, validate_comment,
};
use bastion_dns_domain::{ClientDomainRule, DomainError, RuleKind};
use std::sync::Arc;
use tracing::info;

pub struct CreateClientRuleUseCase {
    repository: Arc<dyn ClientRuleRepository>,
}

impl CreateClientRuleUseCase {
    pub fn new(repository: Arc<dyn ClientRuleRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(
        &self,
        client_ip: &str,
        domain: &str,
        kind: &str,
        comment: Option<String>,
    ) -> Result<ClientDomainRule, DomainError> {
        let ip = parse_client_ip(client_ip)?;
        let domain = normalize_and_validate_domain(domain, false)?;
        let kind: RuleKind = kind.parse().map_err(DomainError::InvalidInput)?;
        validate_comment(comment.as_deref()).map_err(DomainError::InvalidInput)?;

        let rule = ClientDomainRule::new(
            ip,
            Arc::from(domain.as_str()),
            kind,
            comment.map(|c| Arc::from(c.as_str())),
        );
        let created = self.repository.create(rule).await?;

        info!(client_ip = %ip, domain = %created.domain, kind = %created.kind, "Client rule created");
        Ok(created)
    }
}
