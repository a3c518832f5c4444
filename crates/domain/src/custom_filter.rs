use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Blacklist,
    Whitelist,
}

impl FilterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::Blacklist => "blacklist",
            FilterKind::Whitelist => "whitelist",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blacklist" => Ok(FilterKind::Blacklist),
            "whitelist" => Ok(FilterKind::Whitelist),
            other => Err(format!(
                "filter type must be 'blacklist' or 'whitelist', got '{}'",
                other
            )),
        }
    }
}

/// Administrator-entered single-domain rule with global scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomFilter {
    pub id: Option<i64>,
    /// Always normalized.
    pub domain: Arc<str>,
    pub kind: FilterKind,
    pub comment: Option<Arc<str>>,
    pub created_at: Option<String>,
}

impl CustomFilter {
    pub fn new(domain: Arc<str>, kind: FilterKind, comment: Option<Arc<str>>) -> Self {
        Self {
            id: None,
            domain,
            kind,
            comment,
            created_at: None,
        }
    }
}
