use bastion_dns_application::use_cases::RefreshSummary;
use bastion_dns_domain::BlocklistSource;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlocklistResponse {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub enabled: bool,
    pub format: String,
    pub domain_count: u64,
    pub last_refreshed: Option<String>,
    pub last_error: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<BlocklistSource> for BlocklistResponse {
    fn from(source: BlocklistSource) -> Self {
        Self {
            id: source.id.unwrap_or(0),
            name: source.name.to_string(),
            url: source.url.to_string(),
            enabled: source.enabled,
            format: source.format.to_string(),
            domain_count: source.domain_count,
            last_refreshed: source.last_refreshed,
            last_error: source.last_error.map(|e| e.to_string()),
            created_at: source.created_at,
            updated_at: source.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBlocklistRequest {
    pub name: String,
    pub url: String,
    /// `auto` (default), `hosts`, `domains` or `adblock`
    pub format: Option<String>,
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBlocklistRequest {
    pub name: Option<String>,
    pub url: Option<String>,
    pub format: Option<String>,
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub refreshed: usize,
    pub failed: usize,
    pub total_domains: u64,
}

impl From<RefreshSummary> for RefreshResponse {
    fn from(summary: RefreshSummary) -> Self {
        Self {
            refreshed: summary.refreshed,
            failed: summary.failed,
            total_domains: summary.total_domains,
        }
    }
}
