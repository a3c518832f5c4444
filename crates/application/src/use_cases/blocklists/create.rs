use crate::ports::BlocklistRepository;
use bastion_dns_domain::{BlocklistSource, DomainError, ListFormat};
use std::sync::Arc;
use tracing::info;

pub struct CreateBlocklistUseCase {
    repository: Arc<dyn BlocklistRepository>,
}

impl CreateBlocklistUseCase {
    pub fn new(repository: Arc<dyn BlocklistRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(
        &self,
        name: String,
        url: String,
        format: Option<String>,
        enabled: Option<bool>,
    ) -> Result<BlocklistSource, DomainError> {
        let name = name.trim().to_string();
        let url = url.trim().to_string();
        BlocklistSource::validate_name(&name).map_err(DomainError::InvalidInput)?;
        BlocklistSource::validate_url(&url).map_err(DomainError::InvalidInput)?;
        let format: ListFormat = format
            .as_deref()
            .unwrap_or("auto")
            .parse()
            .map_err(DomainError::InvalidInput)?;

        let source = BlocklistSource::new(
            Arc::from(name.as_str()),
            Arc::from(url.as_str()),
            format,
            enabled.unwrap_or(true),
        );
        let created = self.repository.create(source).await?;

        info!(id = ?created.id, name = %created.name, "Blocklist created");
        Ok(created)
    }
}
