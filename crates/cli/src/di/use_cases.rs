use super::{DnsServices, Repositories};
use bastion_dns_api::AppState;
use bastion_dns_application::use_cases::*;
use bastion_dns_jobs::RetentionWindow;
use std::sync::Arc;

pub struct UseCases {
    pub seed_blocklists: Arc<SeedDefaultBlocklistsUseCase>,
    pub refresh_blocklists: Arc<RefreshBlocklistsUseCase>,
    pub state: AppState,
}

impl UseCases {
    pub fn new(repos: &Repositories, dns: &DnsServices, retention: RetentionWindow) -> Self {
        let live_stats = Arc::new(dns.metrics.clone());
        let refresh_blocklists = Arc::new(RefreshBlocklistsUseCase::new(
            repos.blocklists.clone(),
            repos.fetcher.clone(),
            dns.engine.clone(),
        ));

        let update_config = UpdateConfigUseCase::new(repos.config.clone())
            .with_observer(dns.engine.clone())
            .with_observer(dns.forwarder.clone())
            .with_observer(dns.cache.clone())
            .with_observer(dns.handler.clone())
            .with_observer(Arc::new(retention));

        let state = AppState {
            engine: dns.engine.clone(),
            dns_server: dns.controller.clone(),
            get_config: Arc::new(GetConfigUseCase::new(repos.config.clone())),
            update_config: Arc::new(update_config),
            get_blocklists: Arc::new(GetBlocklistsUseCase::new(repos.blocklists.clone())),
            create_blocklist: Arc::new(CreateBlocklistUseCase::new(repos.blocklists.clone())),
            update_blocklist: Arc::new(UpdateBlocklistUseCase::new(repos.blocklists.clone())),
            delete_blocklist: Arc::new(DeleteBlocklistUseCase::new(repos.blocklists.clone())),
            refresh_blocklists: refresh_blocklists.clone(),
            get_filters: Arc::new(GetFiltersUseCase::new(repos.filters.clone())),
            create_filter: Arc::new(CreateFilterUseCase::new(repos.filters.clone())),
            delete_filter: Arc::new(DeleteFilterUseCase::new(repos.filters.clone())),
            get_rewrites: Arc::new(GetRewritesUseCase::new(repos.rewrites.clone())),
            create_rewrite: Arc::new(CreateRewriteUseCase::new(repos.rewrites.clone())),
            update_rewrite: Arc::new(UpdateRewriteUseCase::new(repos.rewrites.clone())),
            delete_rewrite: Arc::new(DeleteRewriteUseCase::new(repos.rewrites.clone())),
            get_query_log: Arc::new(GetQueryLogUseCase::new(repos.query_log.clone())),
            get_stats: Arc::new(GetRealtimeStatsUseCase::new(
                live_stats.clone(),
                repos.query_log.clone(),
            )),
            get_history: Arc::new(GetQueryHistoryUseCase::new(live_stats)),
            get_clients: Arc::new(GetClientsUseCase::new(
                repos.query_log.clone(),
                repos.client_settings.clone(),
            )),
            ban_client: Arc::new(BanClientUseCase::new(repos.client_settings.clone())),
            unban_client: Arc::new(UnbanClientUseCase::new(repos.client_settings.clone())),
            get_client_rules: Arc::new(GetClientRulesUseCase::new(repos.client_rules.clone())),
            create_client_rule: Arc::new(CreateClientRuleUseCase::new(
                repos.client_rules.clone(),
            )),
            delete_client_rule: Arc::new(DeleteClientRuleUseCase::new(
                repos.client_rules.clone(),
            )),
            get_custom_rules: Arc::new(GetCustomRulesUseCase::new(
                repos.filters.clone(),
                repos.client_rules.clone(),
                repos.client_settings.clone(),
            )),
            check_domain: Arc::new(CheckDomainStatusUseCase::new(dns.engine.clone())),
        };

        Self {
            seed_blocklists: Arc::new(SeedDefaultBlocklistsUseCase::new(
                repos.blocklists.clone(),
            )),
            refresh_blocklists,
            state,
        }
    }
}
