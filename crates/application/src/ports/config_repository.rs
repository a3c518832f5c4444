use async_trait::async_trait;
use bastion_dns_domain::{Config, DomainError};

#[async_trait]
pub trait ConfigRepository: Send + Sync {
    async fn get_config(&self) -> Result<Config, DomainError>;

    /// Persists `config` and makes it the current configuration.
    async fn save_config(&self, config: &Config) -> Result<(), DomainError>;
}

/// Notified after a configuration update has been persisted, so running
/// components can pick up the settings they can change live.
pub trait ConfigObserver: Send + Sync {
    fn config_changed(&self, config: &Config);
}
