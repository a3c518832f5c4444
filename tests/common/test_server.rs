use bastion_dns_api::{create_api_routes, AppState};
use bastion_dns_application::ports::DnsServerControl;
use bastion_dns_application::use_cases::*;
use bastion_dns_domain::Config;
use bastion_dns_infrastructure::blocklist::HttpBlocklistFetcher;
use bastion_dns_infrastructure::database::create_memory_pool;
use bastion_dns_infrastructure::dns::{
    AnswerCache, DnsServerController, FilterEngine, QueryHandler, QueryMetrics, RuleCompiler,
    UpstreamForwarder,
};
use bastion_dns_infrastructure::repositories::{
    FileConfigRepository, SqliteBlocklistRepository, SqliteClientRuleRepository,
    SqliteClientSettingsRepository, SqliteCustomFilterRepository, SqliteQueryLogRepository,
    SqliteRewriteRepository,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// The whole service on ephemeral loopback ports: DNS over UDP/TCP and the
/// admin API over HTTP, backed by in-memory SQLite.
pub struct TestServer {
    dns_addr: SocketAddr,
    web_addr: SocketAddr,
    controller: Arc<DnsServerController>,
    shutdown: CancellationToken,
}

impl TestServer {
    pub async fn start(upstreams: &[String]) -> Self {
        let mut config = Config::default();
        config.server.bind_address = "127.0.0.1".to_string();
        config.server.dns_port = 0;
        config.dns.upstream_servers = upstreams.to_vec();
        config.dns.query_timeout = 250;
        config.blocking.default_blocklists = false;

        let pool = create_memory_pool().await.unwrap();
        let blocklists = Arc::new(SqliteBlocklistRepository::new(pool.clone()));
        let filters = Arc::new(SqliteCustomFilterRepository::new(pool.clone()));
        let rewrites = Arc::new(SqliteRewriteRepository::new(pool.clone()));
        let client_settings = Arc::new(SqliteClientSettingsRepository::new(pool.clone()));
        let client_rules = Arc::new(SqliteClientRuleRepository::new(pool.clone()));
        let query_log = Arc::new(SqliteQueryLogRepository::new(pool));
        let config_repo = Arc::new(FileConfigRepository::in_memory(config.clone()));
        let fetcher = Arc::new(
            HttpBlocklistFetcher::new(reqwest::Client::new()).with_timeout(Duration::from_secs(2)),
        );

        let compiler = RuleCompiler::new(
            blocklists.clone(),
            filters.clone(),
            rewrites.clone(),
            client_settings.clone(),
            client_rules.clone(),
        );
        let engine = Arc::new(FilterEngine::load(compiler, true).await.unwrap());
        let forwarder = Arc::new(UpstreamForwarder::from_config(&config).unwrap());
        let cache = Arc::new(AnswerCache::from_config(&config));
        let metrics = QueryMetrics::new();
        let handler = Arc::new(
            QueryHandler::new(
                engine.clone(),
                forwarder.clone(),
                query_log.clone(),
                metrics.clone(),
                &config,
            )
            .with_cache(cache.clone()),
        );
        let controller = Arc::new(
            DnsServerController::new(handler.clone(), forwarder.clone(), config_repo.clone())
                .with_grace_period(Duration::from_millis(500)),
        );
        controller.start().await.unwrap();
        let dns_addr = controller.local_addr().unwrap();

        let live_stats = Arc::new(metrics);
        let state = AppState {
            engine: engine.clone(),
            dns_server: controller.clone(),
            get_config: Arc::new(GetConfigUseCase::new(config_repo.clone())),
            update_config: Arc::new(
                UpdateConfigUseCase::new(config_repo)
                    .with_observer(engine.clone())
                    .with_observer(forwarder)
                    .with_observer(cache)
                    .with_observer(handler),
            ),
            get_blocklists: Arc::new(GetBlocklistsUseCase::new(blocklists.clone())),
            create_blocklist: Arc::new(CreateBlocklistUseCase::new(blocklists.clone())),
            update_blocklist: Arc::new(UpdateBlocklistUseCase::new(blocklists.clone())),
            delete_blocklist: Arc::new(DeleteBlocklistUseCase::new(blocklists.clone())),
            refresh_blocklists: Arc::new(RefreshBlocklistsUseCase::new(
                blocklists,
                fetcher,
                engine.clone(),
            )),
            get_filters: Arc::new(GetFiltersUseCase::new(filters.clone())),
            create_filter: Arc::new(CreateFilterUseCase::new(filters.clone())),
            delete_filter: Arc::new(DeleteFilterUseCase::new(filters.clone())),
            get_rewrites: Arc::new(GetRewritesUseCase::new(rewrites.clone())),
            create_rewrite: Arc::new(CreateRewriteUseCase::new(rewrites.clone())),
            update_rewrite: Arc::new(UpdateRewriteUseCase::new(rewrites.clone())),
            delete_rewrite: Arc::new(DeleteRewriteUseCase::new(rewrites)),
            get_query_log: Arc::new(GetQueryLogUseCase::new(query_log.clone())),
            get_stats: Arc::new(GetRealtimeStatsUseCase::new(
                live_stats.clone(),
                query_log.clone(),
            )),
            get_history: Arc::new(GetQueryHistoryUseCase::new(live_stats)),
            get_clients: Arc::new(GetClientsUseCase::new(query_log, client_settings.clone())),
            ban_client: Arc::new(BanClientUseCase::new(client_settings.clone())),
            unban_client: Arc::new(UnbanClientUseCase::new(client_settings.clone())),
            get_client_rules: Arc::new(GetClientRulesUseCase::new(client_rules.clone())),
            create_client_rule: Arc::new(CreateClientRuleUseCase::new(client_rules.clone())),
            delete_client_rule: Arc::new(DeleteClientRuleUseCase::new(client_rules.clone())),
            get_custom_rules: Arc::new(GetCustomRulesUseCase::new(
                filters,
                client_rules,
                client_settings,
            )),
            check_domain: Arc::new(CheckDomainStatusUseCase::new(engine.clone())),
        };

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let web_addr = listener.local_addr().unwrap();
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();
        tokio::spawn(async move {
            let _ = axum::serve(listener, create_api_routes(state))
                .with_graceful_shutdown(token.cancelled_owned())
                .await;
        });

        Self {
            dns_addr,
            web_addr,
            controller,
            shutdown,
        }
    }

    pub fn dns_addr(&self) -> SocketAddr {
        self.dns_addr
    }

    pub fn web_addr(&self) -> SocketAddr {
        self.web_addr
    }

    pub async fn shutdown(self) {
        self.shutdown.cancel();
        if self.controller.is_running() {
            let _ = self.controller.stop().await;
        }
    }
}
