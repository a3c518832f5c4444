use crate::ports::{ConfigObserver, ConfigRepository};
use bastion_dns_domain::{Config, DomainError};
use std::sync::Arc;
use tracing::info;

pub struct UpdateConfigUseCase {
    repository: Arc<dyn ConfigRepository>,
    observers: Vec<Arc<dyn ConfigObserver>>,
}

impl UpdateConfigUseCase {
    pub fn new(repository: Arc<dyn ConfigRepository>) -> Self {
        Self {
            repository,
            observers: Vec::new(),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ConfigObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Validates, persists, then notifies observers. Nothing is saved or
    /// applied when validation fails.
    pub async fn execute(&self, config: Config) -> Result<Config, DomainError> {
        config
            .validate()
            .map_err(|e| DomainError::InvalidInput(e.to_string()))?;

        self.repository.save_config(&config).await?;
        for observer in &self.observers {
            observer.config_changed(&config);
        }

        info!("Configuration updated");
        Ok(config)
    }
}
