use bastion_dns_domain::Config;
use bastion_dns_infrastructure::blocklist::HttpBlocklistFetcher;
use bastion_dns_infrastructure::repositories::{
    FileConfigRepository, SqliteBlocklistRepository, SqliteClientRuleRepository,
    SqliteClientSettingsRepository, SqliteCustomFilterRepository, SqliteQueryLogRepository,
    SqliteRewriteRepository,
};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;

pub struct Repositories {
    pub blocklists: Arc<SqliteBlocklistRepository>,
    pub filters: Arc<SqliteCustomFilterRepository>,
    pub rewrites: Arc<SqliteRewriteRepository>,
    pub client_settings: Arc<SqliteClientSettingsRepository>,
    pub client_rules: Arc<SqliteClientRuleRepository>,
    pub query_log: Arc<SqliteQueryLogRepository>,
    pub config: Arc<FileConfigRepository>,
    pub fetcher: Arc<HttpBlocklistFetcher>,
}

impl Repositories {
    pub fn new(pool: SqlitePool, config: Config, config_path: Option<PathBuf>) -> Self {
        Self {
            blocklists: Arc::new(SqliteBlocklistRepository::new(pool.clone())),
            filters: Arc::new(SqliteCustomFilterRepository::new(pool.clone())),
            rewrites: Arc::new(SqliteRewriteRepository::new(pool.clone())),
            client_settings: Arc::new(SqliteClientSettingsRepository::new(pool.clone())),
            client_rules: Arc::new(SqliteClientRuleRepository::new(pool.clone())),
            query_log: Arc::new(SqliteQueryLogRepository::new(pool)),
            config: Arc::new(FileConfigRepository::new(config, config_path)),
            fetcher: Arc::new(HttpBlocklistFetcher::new(reqwest::Client::new())),
        }
    }
}
