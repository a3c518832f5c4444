use bastion_dns_domain::config::{BlockingMode, Config};
use serde::{Deserialize, Serialize};

/// The runtime-adjustable part of the configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnsConfigResponse {
    pub upstream_servers: Vec<String>,
    pub query_timeout: u64,
    pub blocking_enabled: bool,
    pub blocking_mode: BlockingMode,
    pub rewrite_ttl: u32,
    pub blocked_ttl: u32,
    pub cache_enabled: bool,
    pub cache_ttl: u32,
    pub refresh_interval: u64,
    pub query_logging: bool,
    pub log_retention_days: u32,
}

impl From<&Config> for DnsConfigResponse {
    fn from(config: &Config) -> Self {
        Self {
            upstream_servers: config.dns.upstream_servers.clone(),
            query_timeout: config.dns.query_timeout,
            blocking_enabled: config.blocking.enabled,
            blocking_mode: config.dns.blocking_mode,
            rewrite_ttl: config.dns.rewrite_ttl,
            blocked_ttl: config.dns.blocked_ttl,
            cache_enabled: config.dns.cache_enabled,
            cache_ttl: config.dns.cache_ttl,
            refresh_interval: config.blocking.refresh_interval,
            query_logging: config.database.query_logging,
            log_retention_days: config.database.log_retention_days,
        }
    }
}

/// Fields left out keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDnsConfigRequest {
    pub upstream_servers: Option<Vec<String>>,
    pub query_timeout: Option<u64>,
    pub blocking_enabled: Option<bool>,
    pub blocking_mode: Option<BlockingMode>,
    pub rewrite_ttl: Option<u32>,
    pub blocked_ttl: Option<u32>,
    pub cache_enabled: Option<bool>,
    pub cache_ttl: Option<u32>,
    pub refresh_interval: Option<u64>,
    pub query_logging: Option<bool>,
    pub log_retention_days: Option<u32>,
}

impl UpdateDnsConfigRequest {
    pub fn apply_to(self, config: &mut Config) {
        if let Some(upstreams) = self.upstream_servers {
            config.dns.upstream_servers = upstreams
                .into_iter()
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty())
                .collect();
        }
        if let Some(timeout) = self.query_timeout {
            config.dns.query_timeout = timeout;
        }
        if let Some(enabled) = self.blocking_enabled {
            config.blocking.enabled = enabled;
        }
        if let Some(mode) = self.blocking_mode {
            config.dns.blocking_mode = mode;
        }
        if let Some(ttl) = self.rewrite_ttl {
            config.dns.rewrite_ttl = ttl;
        }
        if let Some(ttl) = self.blocked_ttl {
            config.dns.blocked_ttl = ttl;
        }
        if let Some(enabled) = self.cache_enabled {
            config.dns.cache_enabled = enabled;
        }
        if let Some(ttl) = self.cache_ttl {
            config.dns.cache_ttl = ttl;
        }
        if let Some(interval) = self.refresh_interval {
            config.blocking.refresh_interval = interval;
        }
        if let Some(logging) = self.query_logging {
            config.database.query_logging = logging;
        }
        if let Some(days) = self.log_retention_days {
            config.database.log_retention_days = days;
        }
    }
}
