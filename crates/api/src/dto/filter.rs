use bastion_dns_domain::CustomFilter;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterResponse {
    pub id: i64,
    pub domain: String,
    pub kind: String,
    pub comment: Option<String>,
    pub created_at: Option<String>,
}

impl From<CustomFilter> for FilterResponse {
    fn from(filter: CustomFilter) -> Self {
        Self {
            id: filter.id.unwrap_or(0),
            domain: filter.domain.to_string(),
            kind: filter.kind.to_string(),
            comment: filter.comment.map(|c| c.to_string()),
            created_at: filter.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterQuery {
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateFilterRequest {
    pub domain: String,
    /// `blacklist` or `whitelist`
    pub kind: String,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteFilterRequest {
    pub domain: String,
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedCountResponse {
    pub deleted_count: u64,
}
