use super::{
    BlockingConfig, ConfigError, DatabaseConfig, DnsConfig, LoggingConfig, ServerConfig,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

const DEFAULT_CONFIG_PATHS: &[&str] = &["./bastion-dns.toml", "/etc/bastion-dns/config.toml"];

/// Complete service configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub dns: DnsConfig,

    #[serde(default)]
    pub blocking: BlockingConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Values given on the command line; they win over the file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub web_port: Option<u16>,
    pub bind_address: Option<String>,
    pub database_path: Option<String>,
    pub log_level: Option<String>,
}

impl Config {
    /// Loads the configuration file and applies CLI overrides.
    ///
    /// An explicit `path` must exist. Without one, the default locations are
    /// checked and built-in defaults are used if none exists.
    pub fn load(path: Option<&str>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match Self::resolve_path(path) {
            Some(p) => Self::from_file(&p)?,
            None => Self::default(),
        };

        config.apply_overrides(overrides);
        Ok(config)
    }

    /// The file `load` reads: `path` itself, or the first default location
    /// that exists.
    pub fn resolve_path(path: Option<&str>) -> Option<String> {
        match path {
            Some(p) => Some(p.to_string()),
            None => DEFAULT_CONFIG_PATHS
                .iter()
                .find(|p| Path::new(p).exists())
                .map(|p| p.to_string()),
        }
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    pub fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(port) = overrides.web_port {
            self.server.web_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(path) = overrides.database_path {
            self.database.path = path;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.bind_address.parse::<std::net::IpAddr>().is_err() {
            return Err(ConfigError::Validation(format!(
                "server.bind_address '{}' is not an IP address",
                self.server.bind_address
            )));
        }
        if self.server.dns_port == self.server.web_port {
            return Err(ConfigError::Validation(
                "server.dns_port and server.web_port must differ".to_string(),
            ));
        }
        if self.dns.upstream_servers.is_empty() {
            return Err(ConfigError::Validation(
                "dns.upstream_servers must contain at least one server".to_string(),
            ));
        }
        for upstream in &self.dns.upstream_servers {
            parse_upstream_addr(upstream).map_err(ConfigError::Validation)?;
        }
        if self.dns.query_timeout == 0 {
            return Err(ConfigError::Validation(
                "dns.query_timeout must be greater than 0".to_string(),
            ));
        }
        if self.dns.cache_enabled && self.dns.cache_ttl == 0 {
            return Err(ConfigError::Validation(
                "dns.cache_ttl must be greater than 0 when the cache is enabled".to_string(),
            ));
        }
        if self.blocking.refresh_interval < 60 {
            return Err(ConfigError::Validation(
                "blocking.refresh_interval must be at least 60 seconds".to_string(),
            ));
        }
        if self.database.log_retention_days == 0 {
            return Err(ConfigError::Validation(
                "database.log_retention_days must be at least 1".to_string(),
            ));
        }
        if !matches!(
            self.logging.level.to_ascii_lowercase().as_str(),
            "trace" | "debug" | "info" | "warn" | "error"
        ) {
            return Err(ConfigError::Validation(format!(
                "logging.level '{}' is not a log level",
                self.logging.level
            )));
        }
        Ok(())
    }
}

/// Parses an upstream server, defaulting the port to 53.
pub fn parse_upstream_addr(raw: &str) -> Result<SocketAddr, String> {
    let raw = raw.trim();
    if let Ok(addr) = raw.parse::<SocketAddr>() {
        return Ok(addr);
    }
    raw.parse::<std::net::IpAddr>()
        .map(|ip| SocketAddr::new(ip, 53))
        .map_err(|_| format!("upstream server '{}' is not an IP address with optional port", raw))
}
