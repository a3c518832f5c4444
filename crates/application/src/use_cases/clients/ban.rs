use crate::ports::ClientSettingsRepository;
use bastion_dns_domain::validators::{parse_client_ip, validate_comment};
use bastion_dns_domain::{ClientSettings, DomainError};
use std::sync::Arc;
use tracing::info;

pub struct BanClientUseCase {
    repository: Arc<dyn ClientSettingsRepository>,
}

impl BanClientUseCase {
    pub fn new(repository: Arc<dyn ClientSettingsRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(
        &self,
        client_ip: &str,
        reason: Option<String>,
        client_name: Option<String>,
    ) -> Result<ClientSettings, DomainError> {
        let ip = parse_client_ip(client_ip)?;
        validate_comment(reason.as_deref()).map_err(DomainError::InvalidInput)?;

        let reason = reason.filter(|r| !r.trim().is_empty());
        let settings = self.repository.ban(ip, reason, client_name).await?;

        info!(client_ip = %ip, "Client banned");
        Ok(settings)
    }
}
