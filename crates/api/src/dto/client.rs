use bastion_dns_domain::{ClientActivity, ClientSettings};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientResponse {
    pub client_ip: String,
    pub query_count: u64,
    pub blocked_count: u64,
    pub last_seen: Option<String>,
    pub is_banned: bool,
}

impl From<ClientActivity> for ClientResponse {
    fn from(activity: ClientActivity) -> Self {
        Self {
            client_ip: activity.client_ip.to_string(),
            query_count: activity.query_count,
            blocked_count: activity.blocked_count,
            last_seen: activity.last_seen,
            is_banned: activity.is_banned,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSettingsResponse {
    pub client_ip: String,
    pub client_name: Option<String>,
    pub blocked: bool,
    pub block_reason: Option<String>,
    pub blocked_at: Option<String>,
}

impl From<ClientSettings> for ClientSettingsResponse {
    fn from(settings: ClientSettings) -> Self {
        Self {
            client_ip: settings.client_ip.to_string(),
            client_name: settings.client_name.map(|n| n.to_string()),
            blocked: settings.blocked,
            block_reason: settings.block_reason.map(|r| r.to_string()),
            blocked_at: settings.blocked_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BanClientRequest {
    pub client_ip: String,
    pub reason: Option<String>,
    pub client_name: Option<String>,
}
