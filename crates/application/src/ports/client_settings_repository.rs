use async_trait::async_trait;
use bastion_dns_domain::{ClientSettings, DomainError};
use std::net::IpAddr;

/// Repository interface for per-client ban state.
#[async_trait]
pub trait ClientSettingsRepository: Send + Sync {
    async fn get(&self, client_ip: IpAddr) -> Result<Option<ClientSettings>, DomainError>;

    /// Banned clients, most recently banned first.
    async fn get_banned(&self) -> Result<Vec<ClientSettings>, DomainError>;

    /// Marks `client_ip` as banned, creating its settings row if needed.
    async fn ban(
        &self,
        client_ip: IpAddr,
        reason: Option<String>,
        client_name: Option<String>,
    ) -> Result<ClientSettings, DomainError>;

    /// Lifts a ban.
    ///
    /// # Errors
    ///
    /// * `DomainError::NotFound` - If there is no settings row for `client_ip`
    async fn unban(&self, client_ip: IpAddr) -> Result<ClientSettings, DomainError>;
}
