use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Text format of a subscribed blocklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListFormat {
    /// Detect per line.
    #[default]
    Auto,
    /// `0.0.0.0 domain` lines.
    Hosts,
    /// One domain per line.
    Domains,
    /// `||domain^` network rules.
    Adblock,
}

impl ListFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListFormat::Auto => "auto",
            ListFormat::Hosts => "hosts",
            ListFormat::Domains => "domains",
            ListFormat::Adblock => "adblock",
        }
    }
}

impl fmt::Display for ListFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(ListFormat::Auto),
            "hosts" => Ok(ListFormat::Hosts),
            "domains" => Ok(ListFormat::Domains),
            "adblock" => Ok(ListFormat::Adblock),
            other => Err(format!("unknown blocklist format '{}'", other)),
        }
    }
}

/// Subscription to an externally maintained domain list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlocklistSource {
    pub id: Option<i64>,
    pub name: Arc<str>,
    pub url: Arc<str>,
    pub enabled: bool,
    pub format: ListFormat,
    pub domain_count: u64,
    pub last_refreshed: Option<String>,
    pub last_error: Option<Arc<str>>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl BlocklistSource {
    pub fn new(name: Arc<str>, url: Arc<str>, format: ListFormat, enabled: bool) -> Self {
        Self {
            id: None,
            name,
            url,
            enabled,
            format,
            domain_count: 0,
            last_refreshed: None,
            last_error: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn validate_name(name: &str) -> Result<(), String> {
        crate::validators::validate_source_name(name, "Blocklist")
    }

    pub fn validate_url(url: &str) -> Result<(), String> {
        crate::validators::validate_url(url)
    }
}

/// Outcome of one refresh attempt of a [`BlocklistSource`].
#[derive(Debug, Clone)]
pub struct BlocklistRefresh {
    pub source_id: i64,
    pub domain_count: u64,
    pub error: Option<String>,
}

/// Lists seeded into an empty store when default blocklists are enabled.
pub const DEFAULT_BLOCKLISTS: &[(&str, &str)] = &[
    (
        "AdGuard DNS filter",
        "https://adguardteam.github.io/HostlistsRegistry/assets/filter_1.txt",
    ),
    (
        "AdAway Default Blocklist",
        "https://adguardteam.github.io/HostlistsRegistry/assets/filter_2.txt",
    ),
];
