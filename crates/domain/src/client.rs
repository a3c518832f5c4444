use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use std::sync::Arc;

/// Full ban state of one client IP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSettings {
    pub client_ip: IpAddr,
    pub client_name: Option<Arc<str>>,
    pub blocked: bool,
    pub block_reason: Option<Arc<str>>,
    pub blocked_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    Block,
    Allow,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Block => "block",
            RuleKind::Allow => "allow",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "block" => Ok(RuleKind::Block),
            "allow" => Ok(RuleKind::Allow),
            other => Err(format!("rule type must be 'block' or 'allow', got '{}'", other)),
        }
    }
}

/// Per-client override for one domain (and its subdomains).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientDomainRule {
    pub id: Option<i64>,
    pub client_ip: IpAddr,
    /// Always normalized.
    pub domain: Arc<str>,
    pub kind: RuleKind,
    pub comment: Option<Arc<str>>,
    pub created_at: Option<String>,
}

impl ClientDomainRule {
    pub fn new(
        client_ip: IpAddr,
        domain: Arc<str>,
        kind: RuleKind,
        comment: Option<Arc<str>>,
    ) -> Self {
        Self {
            id: None,
            client_ip,
            domain,
            kind,
            comment,
            created_at: None,
        }
    }
}

/// Per-client aggregate computed from the query log.
#[derive(Debug, Clone, Serialize)]
pub struct ClientActivity {
    pub client_ip: IpAddr,
    pub query_count: u64,
    pub blocked_count: u64,
    pub last_seen: Option<String>,
    pub is_banned: bool,
}
