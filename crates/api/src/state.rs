use bastion_dns_application::ports::{DnsServerControl, FilterEnginePort};
use bastion_dns_application::use_cases::{
    BanClientUseCase, CheckDomainStatusUseCase, CreateBlocklistUseCase, CreateClientRuleUseCase,
    CreateFilterUseCase, CreateRewriteUseCase, DeleteBlocklistUseCase, DeleteClientRuleUseCase,
    DeleteFilterUseCase, DeleteRewriteUseCase, GetBlocklistsUseCase, GetClientRulesUseCase,
    GetClientsUseCase, GetConfigUseCase, GetCustomRulesUseCase, GetFiltersUseCase,
    GetQueryHistoryUseCase, GetQueryLogUseCase, GetRealtimeStatsUseCase, GetRewritesUseCase,
    RefreshBlocklistsUseCase, UnbanClientUseCase, UpdateBlocklistUseCase, UpdateConfigUseCase,
    UpdateRewriteUseCase,
};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn FilterEnginePort>,
    pub dns_server: Arc<dyn DnsServerControl>,

    pub get_config: Arc<GetConfigUseCase>,
    pub update_config: Arc<UpdateConfigUseCase>,

    pub get_blocklists: Arc<GetBlocklistsUseCase>,
    pub create_blocklist: Arc<CreateBlocklistUseCase>,
    pub update_blocklist: Arc<UpdateBlocklistUseCase>,
    pub delete_blocklist: Arc<DeleteBlocklistUseCase>,
    pub refresh_blocklists: Arc<RefreshBlocklistsUseCase>,

    pub get_filters: Arc<GetFiltersUseCase>,
    pub create_filter: Arc<CreateFilterUseCase>,
    pub delete_filter: Arc<DeleteFilterUseCase>,

    pub get_rewrites: Arc<GetRewritesUseCase>,
    pub create_rewrite: Arc<CreateRewriteUseCase>,
    pub update_rewrite: Arc<UpdateRewriteUseCase>,
    pub delete_rewrite: Arc<DeleteRewriteUseCase>,

    pub get_query_log: Arc<GetQueryLogUseCase>,
    pub get_stats: Arc<GetRealtimeStatsUseCase>,
    pub get_history: Arc<GetQueryHistoryUseCase>,

    pub get_clients: Arc<GetClientsUseCase>,
    pub ban_client: Arc<BanClientUseCase>,
    pub unban_client: Arc<UnbanClientUseCase>,

    pub get_client_rules: Arc<GetClientRulesUseCase>,
    pub create_client_rule: Arc<CreateClientRuleUseCase>,
    pub delete_client_rule: Arc<DeleteClientRuleUseCase>,

    pub get_custom_rules: Arc<GetCustomRulesUseCase>,
    pub check_domain: Arc<CheckDomainStatusUseCase>,
}

impl AppState {
    /// Recompile the filter snapshot in the background. The request that
    /// changed the rules does not wait for it.
    pub fn spawn_reload(&self, reason: &'static str) {
        let engine = Arc::clone(&self.engine);
        tokio::spawn(async move {
            match engine.reload().await {
                Ok(()) => info!(reason, "Filters reloaded"),
                Err(e) => error!(reason, error = %e, "Filter reload failed"),
            }
        });
    }

    /// Download every enabled blocklist in the background, then reload.
    pub fn spawn_refresh(&self, reason: &'static str) {
        let refresh = Arc::clone(&self.refresh_blocklists);
        tokio::spawn(async move {
            if let Err(e) = refresh.execute().await {
                error!(reason, error = %e, "Blocklist refresh failed");
            }
        });
    }
}
