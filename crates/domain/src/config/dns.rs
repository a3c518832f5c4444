use serde::{Deserialize, Serialize};

/// Answer synthesized for a blocked query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockingMode {
    /// NXDOMAIN for every record type.
    #[default]
    Nxdomain,
    /// `0.0.0.0` / `::` for A/AAAA, empty NOERROR otherwise.
    NullIp,
}

impl BlockingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockingMode::Nxdomain => "nxdomain",
            BlockingMode::NullIp => "null_ip",
        }
    }
}

/// Upstream forwarding and local answer settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DnsConfig {
    /// Tried in order; `host:port`, port defaults to 53
    #[serde(default = "default_upstream_servers")]
    pub upstream_servers: Vec<String>,

    /// Per-attempt upstream timeout in milliseconds
    #[serde(default = "default_query_timeout")]
    pub query_timeout: u64,

    #[serde(default)]
    pub blocking_mode: BlockingMode,

    /// TTL of rewrite answers, seconds
    #[serde(default = "default_rewrite_ttl")]
    pub rewrite_ttl: u32,

    /// TTL of sinkhole answers, seconds
    #[serde(default = "default_blocked_ttl")]
    pub blocked_ttl: u32,

    /// Reuse upstream answers for repeated questions
    #[serde(default = "default_cache_enabled")]
    pub cache_enabled: bool,

    /// Lifetime of a cached upstream answer, seconds
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl: u32,
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            upstream_servers: default_upstream_servers(),
            query_timeout: default_query_timeout(),
            blocking_mode: BlockingMode::default(),
            rewrite_ttl: default_rewrite_ttl(),
            blocked_ttl: default_blocked_ttl(),
            cache_enabled: default_cache_enabled(),
            cache_ttl: default_cache_ttl(),
        }
    }
}

fn default_upstream_servers() -> Vec<String> {
    vec!["1.1.1.1:53".to_string(), "8.8.8.8:53".to_string()]
}

fn default_query_timeout() -> u64 {
    2000
}

fn default_rewrite_ttl() -> u32 {
    300
}

fn default_blocked_ttl() -> u32 {
    60
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_ttl() -> u32 {
    3600
}
