use async_trait::async_trait;
use bastion_dns_domain::DomainError;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct UpstreamHealth {
    pub address: String,
    pub healthy: bool,
    pub consecutive_failures: u32,
    pub cooldown_remaining_secs: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DnsServerStatus {
    pub running: bool,
    pub bind_address: Option<String>,
    pub started_at: Option<String>,
    pub uptime_seconds: u64,
    pub upstreams: Vec<UpstreamHealth>,
}

/// Runtime control of the UDP/TCP listeners.
#[async_trait]
pub trait DnsServerControl: Send + Sync {
    /// Bind the listeners with the current configuration.
    ///
    /// # Errors
    ///
    /// * `DomainError::ServerAlreadyRunning` - If the listeners are up
    /// * `DomainError::IoError` - If binding fails
    async fn start(&self) -> Result<(), DomainError>;

    /// Stop accepting queries and drain in-flight ones.
    ///
    /// # Errors
    ///
    /// * `DomainError::ServerNotRunning` - If the listeners are down
    async fn stop(&self) -> Result<(), DomainError>;

    fn status(&self) -> DnsServerStatus;
}
