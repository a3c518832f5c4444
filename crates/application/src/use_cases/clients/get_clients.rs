use crate::ports::{ClientSettingsRepository, QueryLogRepository};
use bastion_dns_domain::{ClientActivity, DomainError};
use std::collections::HashSet;
use std::sync::Arc;

const MAX_CLIENTS: u32 = 100;

/// Lists clients seen in the query log with their ban state.
pub struct GetClientsUseCase {
    query_log: Arc<dyn QueryLogRepository>,
    settings: Arc<dyn ClientSettingsRepository>,
}

impl GetClientsUseCase {
    pub fn new(
        query_log: Arc<dyn QueryLogRepository>,
        settings: Arc<dyn ClientSettingsRepository>,
    ) -> Self {
        Self {
            query_log,
            settings,
        }
    }

    pub async fn execute(&self) -> Result<Vec<ClientActivity>, DomainError> {
        let mut clients = self.query_log.client_activity(MAX_CLIENTS).await?;
        let banned: HashSet<_> = self
            .settings
            .get_banned()
            .await?
            .into_iter()
            .map(|s| s.client_ip)
            .collect();

        for client in &mut clients {
            client.is_banned = banned.contains(&client.client_ip);
        }
        Ok(clients)
    }
}
