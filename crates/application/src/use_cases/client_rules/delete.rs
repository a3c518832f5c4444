use crate::ports::ClientRuleRepository;
use bastion_dns_domain::validators::{normalize_and_validate_domain, parse_client_ip};
use bastion_dns_domain::{DomainError, RuleKind};
use std::net::IpAddr;
use std::sync::Arc;

pub struct DeleteClientRuleUseCase {
    repository: Arc<dyn ClientRuleRepository>,
}

impl DeleteClientRuleUseCase {
    pub fn new(repository: Arc<dyn ClientRuleRepository>) -> Self {
        Self { repository }
    }

    /// Returns the IP of the client whose rules changed.
    pub async fn execute(&self, id: i64) -> Result<IpAddr, DomainError> {
        let rule = self.repository.delete(id).await?;
        Ok(rule.client_ip)
    }

    /// Returns the client IP and the number of rules removed.
    pub async fn execute_by_details(
        &self,
        client_ip: &str,
        domain: &str,
        kind: &str,
    ) -> Result<(IpAddr, u64), DomainError> {
        let ip = parse_client_ip(client_ip)?;
        let domain = normalize_and_validate_domain(domain, false)?;
        let kind: RuleKind = kind.parse().map_err(DomainError::InvalidInput)?;
        let deleted = self.repository.delete_by_details(ip, &domain, kind).await?;
        Ok((ip, deleted))
    }
}
