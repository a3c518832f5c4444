use bastion_dns_application::use_cases::{CustomRulesView, DomainStatus};
use bastion_dns_domain::ClientDomainRule;
use serde::{Deserialize, Serialize};

use super::client::ClientSettingsResponse;
use super::filter::FilterResponse;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRuleResponse {
    pub id: i64,
    pub client_ip: String,
    pub domain: String,
    pub kind: String,
    pub comment: Option<String>,
    pub created_at: Option<String>,
}

impl From<ClientDomainRule> for ClientRuleResponse {
    fn from(rule: ClientDomainRule) -> Self {
        Self {
            id: rule.id.unwrap_or(0),
            client_ip: rule.client_ip.to_string(),
            domain: rule.domain.to_string(),
            kind: rule.kind.to_string(),
            comment: rule.comment.map(|c| c.to_string()),
            created_at: rule.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientRuleQuery {
    pub client_ip: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateClientRuleRequest {
    pub client_ip: String,
    pub domain: String,
    /// `block` or `allow`
    pub kind: String,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteClientRuleRequest {
    pub client_ip: String,
    pub domain: String,
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomRulesResponse {
    pub global_filters: Vec<FilterResponse>,
    pub client_rules: Vec<ClientRuleResponse>,
    pub banned_clients: Vec<ClientSettingsResponse>,
}

impl From<CustomRulesView> for CustomRulesResponse {
    fn from(view: CustomRulesView) -> Self {
        Self {
            global_filters: view.global_filters.into_iter().map(Into::into).collect(),
            client_rules: view.client_rules.into_iter().map(Into::into).collect(),
            banned_clients: view.banned_clients.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckDomainQuery {
    pub domain: String,
    pub client_ip: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DomainStatusResponse {
    pub global_domain_block: bool,
    pub client_specific_block: bool,
    pub client_block: bool,
}

impl From<DomainStatus> for DomainStatusResponse {
    fn from(status: DomainStatus) -> Self {
        Self {
            global_domain_block: status.global_domain_block,
            client_specific_block: status.client_specific_block,
            client_block: status.client_block,
        }
    }
}
