use crate::ports::BlocklistRepository;
use bastion_dns_domain::{BlocklistSource, DomainError, ListFormat};
use std::sync::Arc;

pub struct UpdateBlocklistUseCase {
    repository: Arc<dyn BlocklistRepository>,
}

impl UpdateBlocklistUseCase {
    pub fn new(repository: Arc<dyn BlocklistRepository>) -> Self {
        Self { repository }
    }

    /// Applies the given fields; `None` keeps the stored value.
    pub async fn execute(
        &self,
        id: i64,
        name: Option<String>,
        url: Option<String>,
        format: Option<String>,
        enabled: Option<bool>,
    ) -> Result<BlocklistSource, DomainError> {
        let mut source = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Blocklist {} not found", id)))?;

        if let Some(name) = name {
            let name = name.trim();
            BlocklistSource::validate_name(name).map_err(DomainError::InvalidInput)?;
            source.name = Arc::from(name);
        }
        if let Some(url) = url {
            let url = url.trim();
            BlocklistSource::validate_url(url).map_err(DomainError::InvalidInput)?;
            source.url = Arc::from(url);
        }
        if let Some(format) = format {
            source.format = format
                .parse::<ListFormat>()
                .map_err(DomainError::InvalidInput)?;
        }
        if let Some(enabled) = enabled {
            source.enabled = enabled;
        }

        self.repository.update(source).await
    }
}
