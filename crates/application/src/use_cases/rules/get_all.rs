use crate::ports::{ClientRuleRepository, ClientSettingsRepository, CustomFilterRepository};
use bastion_dns_domain::{ClientDomainRule, ClientSettings, CustomFilter, DomainError};
use std::sync::Arc;

/// Every administrator-entered rule in one view.
#[derive(Debug, Clone)]
pub struct CustomRulesView {
    pub global_filters: Vec<CustomFilter>,
    pub client_rules: Vec<ClientDomainRule>,
    /// Most recently banned first.
    pub banned_clients: Vec<ClientSettings>,
}

pub struct GetCustomRulesUseCase {
    filters: Arc<dyn CustomFilterRepository>,
    client_rules: Arc<dyn ClientRuleRepository>,
    client_settings: Arc<dyn ClientSettingsRepository>,
}

impl GetCustomRulesUseCase {
    pub fn new(
        filters: Arc<dyn CustomFilterRepository>,
        client_rules: Arc<dyn ClientRuleRepository>,
        client_settings: Arc<dyn ClientSettingsRepository>,
    ) -> Self {
        Self {
            filters,
            client_rules,
            client_settings,
        }
    }

    pub async fn execute(&self) -> Result<CustomRulesView, DomainError> {
        let (global_filters, client_rules, banned_clients) = tokio::try_join!(
            self.filters.get_all(),
            self.client_rules.get_all(),
            self.client_settings.get_banned(),
        )?;

        Ok(CustomRulesView {
            global_filters,
            client_rules,
            banned_clients,
        })
    }
}
