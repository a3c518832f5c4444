use async_trait::async_trait;
use bastion_dns_domain::{ClientDomainRule, DomainError, RuleKind};
use std::net::IpAddr;

#[async_trait]
pub trait ClientRuleRepository: Send + Sync {
    /// # Errors
    ///
    /// * `DomainError::Conflict` - If the same `(client_ip, domain, kind)` exists
    async fn create(&self, rule: ClientDomainRule) -> Result<ClientDomainRule, DomainError>;

    async fn get_all(&self) -> Result<Vec<ClientDomainRule>, DomainError>;

    async fn get_for_client(&self, client_ip: IpAddr)
        -> Result<Vec<ClientDomainRule>, DomainError>;

    /// Deletes a rule and returns it so callers know which client changed.
    ///
    /// # Errors
    ///
    /// * `DomainError::NotFound` - If no rule with this ID exists
    async fn delete(&self, id: i64) -> Result<ClientDomainRule, DomainError>;

    async fn delete_by_details(
        &self,
        client_ip: IpAddr,
        domain: &str,
        kind: RuleKind,
    ) -> Result<u64, DomainError>;
}
