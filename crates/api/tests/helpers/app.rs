use super::mocks::{MockBlocklistFetcher, MockDnsServer};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use bastion_dns_api::{create_api_routes, AppState};
use bastion_dns_application::use_cases::*;
use bastion_dns_domain::Config;
use bastion_dns_infrastructure::database::create_memory_pool;
use bastion_dns_infrastructure::dns::{FilterEngine, QueryMetrics, RuleCompiler};
use bastion_dns_infrastructure::repositories::{
    FileConfigRepository, SqliteBlocklistRepository, SqliteClientRuleRepository,
    SqliteClientSettingsRepository, SqliteCustomFilterRepository, SqliteQueryLogRepository,
    SqliteRewriteRepository,
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// Admin API wired to in-memory SQLite and a real filter engine.
pub struct TestApp {
    pub router: Router,
    pub engine: Arc<FilterEngine>,
    pub server: Arc<MockDnsServer>,
    pub fetcher: Arc<MockBlocklistFetcher>,
    pub metrics: QueryMetrics,
    pub query_log: Arc<SqliteQueryLogRepository>,
    pub config: Arc<FileConfigRepository>,
}

impl TestApp {
    pub async fn new() -> Self {
        let pool = create_memory_pool().await.unwrap();
        let blocklists = Arc::new(SqliteBlocklistRepository::new(pool.clone()));
        let filters = Arc::new(SqliteCustomFilterRepository::new(pool.clone()));
        let rewrites = Arc::new(SqliteRewriteRepository::new(pool.clone()));
        let client_settings = Arc::new(SqliteClientSettingsRepository::new(pool.clone()));
        let client_rules = Arc::new(SqliteClientRuleRepository::new(pool.clone()));
        let query_log = Arc::new(SqliteQueryLogRepository::new(pool.clone()));
        let config = Arc::new(FileConfigRepository::in_memory(Config::default()));
        let metrics = QueryMetrics::new();
        let fetcher = Arc::new(MockBlocklistFetcher::new());
        let server = Arc::new(MockDnsServer::new());

        let compiler = RuleCompiler::new(
            blocklists.clone(),
            filters.clone(),
            rewrites.clone(),
            client_settings.clone(),
            client_rules.clone(),
        );
        let engine = Arc::new(FilterEngine::load(compiler, true).await.unwrap());
        let live_stats = Arc::new(metrics.clone());

        let state = AppState {
            engine: engine.clone(),
            dns_server: server.clone(),
            get_config: Arc::new(GetConfigUseCase::new(config.clone())),
            update_config: Arc::new(
                UpdateConfigUseCase::new(config.clone()).with_observer(engine.clone()),
            ),
            get_blocklists: Arc::new(GetBlocklistsUseCase::new(blocklists.clone())),
            create_blocklist: Arc::new(CreateBlocklistUseCase::new(blocklists.clone())),
            update_blocklist: Arc::new(UpdateBlocklistUseCase::new(blocklists.clone())),
            delete_blocklist: Arc::new(DeleteBlocklistUseCase::new(blocklists.clone())),
            refresh_blocklists: Arc::new(RefreshBlocklistsUseCase::new(
                blocklists.clone(),
                fetcher.clone(),
                engine.clone(),
            )),
            get_filters: Arc::new(GetFiltersUseCase::new(filters.clone())),
            create_filter: Arc::new(CreateFilterUseCase::new(filters.clone())),
            delete_filter: Arc::new(DeleteFilterUseCase::new(filters.clone())),
            get_rewrites: Arc::new(GetRewritesUseCase::new(rewrites.clone())),
            create_rewrite: Arc::new(CreateRewriteUseCase::new(rewrites.clone())),
            update_rewrite: Arc::new(UpdateRewriteUseCase::new(rewrites.clone())),
            delete_rewrite: Arc::new(DeleteRewriteUseCase::new(rewrites.clone())),
            get_query_log: Arc::new(GetQueryLogUseCase::new(query_log.clone())),
            get_stats: Arc::new(GetRealtimeStatsUseCase::new(
                live_stats.clone(),
                query_log.clone(),
            )),
            get_history: Arc::new(GetQueryHistoryUseCase::new(live_stats)),
            get_clients: Arc::new(GetClientsUseCase::new(
                query_log.clone(),
                client_settings.clone(),
            )),
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

        Self {
            router: create_api_routes(state),
            engine,
            server,
            fetcher,
            metrics,
            query_log,
            config,
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("PUT", uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send("DELETE", uri, None).await
    }

    pub async fn delete_with(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("DELETE", uri, Some(body)).await
    }

    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, value)
    }
}

/// Polls `check` until it holds or two seconds pass.
pub async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    check()
}
