use serde::{Deserialize, Serialize};

/// Domain filtering configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BlockingConfig {
    /// Apply blocklists, custom filters and client block rules (default: true).
    /// Client bans and rewrites apply regardless.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Seconds between blocklist refreshes (default: 3600)
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,

    /// Seed the default lists when no blocklist exists yet
    #[serde(default = "default_true")]
    pub default_blocklists: bool,
}

impl Default for BlockingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            refresh_interval: default_refresh_interval(),
            default_blocklists: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_refresh_interval() -> u64 {
    3600
}
