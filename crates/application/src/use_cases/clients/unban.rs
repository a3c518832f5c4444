use crate::ports::ClientSettingsRepository;
use bastion_dns_domain::validators::parse_client_ip;
use bastion_dns_domain::{ClientSettings, DomainError};
use std::sync::Arc;
use tracing::info;

pub struct UnbanClientUseCase {
    repository: Arc<dyn ClientSettingsRepository>,
}

impl UnbanClientUseCase {
    pub fn new(repository: Arc<dyn ClientSettingsRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, client_ip: &str) -> Result<ClientSettings, DomainError> {
        let ip = parse_client_ip(client_ip)?;
        let settings = self.repository.unban(ip).await?;
        info!(client_ip = %ip, "Client unbanned");
        Ok(settings)
    }
}
