use bastion_dns_application::use_cases::RewriteChanges;
use bastion_dns_domain::Rewrite;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteResponse {
    pub id: i64,
    pub domain: String,
    pub record_type: String,
    pub answer: String,
    pub enabled: bool,
    pub comment: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<Rewrite> for RewriteResponse {
    fn from(rewrite: Rewrite) -> Self {
        Self {
            id: rewrite.id.unwrap_or(0),
            domain: rewrite.domain.to_string(),
            record_type: rewrite.record_type.to_string(),
            answer: rewrite.answer.to_string(),
            enabled: rewrite.enabled,
            comment: rewrite.comment.map(|c| c.to_string()),
            created_at: rewrite.created_at,
            updated_at: rewrite.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRewriteRequest {
    pub domain: String,
    /// `A`, `AAAA` or `CNAME`
    pub record_type: String,
    pub answer: String,
    pub enabled: Option<bool>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRewriteRequest {
    pub domain: Option<String>,
    pub record_type: Option<String>,
    pub answer: Option<String>,
    pub enabled: Option<bool>,
    pub comment: Option<String>,
}

impl From<UpdateRewriteRequest> for RewriteChanges {
    fn from(req: UpdateRewriteRequest) -> Self {
        Self {
            domain: req.domain,
            record_type: req.record_type,
            answer: req.answer,
            enabled: req.enabled,
            comment: req.comment,
        }
    }
}
