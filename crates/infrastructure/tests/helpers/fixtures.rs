#![allow(dead_code)]
use bastion_dns_application::ports::{
    BlocklistRepository, ClientRuleRepository, ClientSettingsRepository, CustomFilterRepository,
    RewriteRepository,
};
use bastion_dns_domain::{
    BlocklistSource, ClientDomainRule, CustomFilter, FilterKind, ListFormat, Rewrite, RewriteType,
    RuleKind,
};
use bastion_dns_infrastructure::database::create_memory_pool;
use bastion_dns_infrastructure::dns::{FilterEngine, RuleCompiler};
use bastion_dns_infrastructure::repositories::{
    SqliteBlocklistRepository, SqliteClientRuleRepository, SqliteClientSettingsRepository,
    SqliteCustomFilterRepository, SqliteRewriteRepository,
};
use sqlx::SqlitePool;
use std::net::IpAddr;
use std::sync::Arc;

pub fn ip(raw: &str) -> IpAddr {
    raw.parse().unwrap()
}

/// In-memory rule store with every repository wired to one pool.
pub struct TestStore {
    pub pool: SqlitePool,
    pub blocklists: Arc<SqliteBlocklistRepository>,
    pub filters: Arc<SqliteCustomFilterRepository>,
    pub rewrites: Arc<SqliteRewriteRepository>,
    pub client_settings: Arc<SqliteClientSettingsRepository>,
    pub client_rules: Arc<SqliteClientRuleRepository>,
}

impl TestStore {
    pub async fn new() -> Self {
        let pool = create_memory_pool().await.unwrap();
        Self {
            blocklists: Arc::new(SqliteBlocklistRepository::new(pool.clone())),
            filters: Arc::new(SqliteCustomFilterRepository::new(pool.clone())),
            rewrites: Arc::new(SqliteRewriteRepository::new(pool.clone())),
            client_settings: Arc::new(SqliteClientSettingsRepository::new(pool.clone())),
            client_rules: Arc::new(SqliteClientRuleRepository::new(pool.clone())),
            pool,
        }
    }

    pub fn compiler(&self) -> RuleCompiler {
        RuleCompiler::new(
            self.blocklists.clone(),
            self.filters.clone(),
            self.rewrites.clone(),
            self.client_settings.clone(),
            self.client_rules.clone(),
        )
    }

    /// Engine with the store's current rules compiled.
    pub async fn engine(&self) -> Arc<FilterEngine> {
        Arc::new(FilterEngine::load(self.compiler(), true).await.unwrap())
    }

    /// One enabled blocklist source holding `domains`.
    pub async fn blocklist(&self, url: &str, domains: &[&str]) -> i64 {
        let source = self
            .blocklists
            .create(BlocklistSource::new(
                Arc::from("test list"),
                Arc::from(url),
                ListFormat::Domains,
                true,
            ))
            .await
            .unwrap();
        let id = source.id.unwrap();
        let domains: Vec<String> = domains.iter().map(|d| d.to_string()).collect();
        self.blocklists.replace_domains(id, &domains).await.unwrap();
        id
    }

    pub async fn filter(&self, domain: &str, kind: FilterKind) -> CustomFilter {
        self.filters
            .create(CustomFilter::new(Arc::from(domain), kind, None))
            .await
            .unwrap()
    }

    pub async fn rewrite(&self, domain: &str, record_type: RewriteType, answer: &str) -> Rewrite {
        self.rewrites
            .create(Rewrite::new(
                Arc::from(domain),
                record_type,
                Arc::from(answer),
                true,
                None,
            ))
            .await
            .unwrap()
    }

    pub async fn ban(&self, client: &str) {
        self.client_settings
            .ban(ip(client), Some("test".to_string()), None)
            .await
            .unwrap();
    }

    pub async fn client_rule(&self, client: &str, domain: &str, kind: RuleKind) -> ClientDomainRule {
        self.client_rules
            .create(ClientDomainRule::new(ip(client), Arc::from(domain), kind, None))
            .await
            .unwrap()
    }
}
