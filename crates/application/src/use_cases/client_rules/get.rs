use crate::ports::ClientRuleRepository;
use bastion_dns_domain::validators::parse_client_ip;
use bastion_dns_domain::{ClientDomainRule, DomainError};
use std::sync::Arc;

pub struct GetClientRulesUseCase {
    repository: Arc<dyn ClientRuleRepository>,
}

impl GetClientRulesUseCase {
    pub fn new(repository: Arc<dyn ClientRuleRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(
        &self,
        client_ip: Option<&str>,
    ) -> Result<Vec<ClientDomainRule>, DomainError> {
        match client_ip.filter(|ip| !ip.trim().is_empty()) {
            Some(ip) => {
                let ip = parse_client_ip(ip)?;
                self.repository.get_for_client(ip).await
            }
            None => self.repository.get_all().await,
        }
    }
}
