#![allow(dead_code)]

use async_trait::async_trait;
use bastion_dns_application::ports::{
    BlocklistFetcher, BlocklistRepository, ClientRuleRepository, ClientSettingsRepository,
    ConfigObserver, ConfigRepository, CustomFilterRepository, FilterDecision, FilterEnginePort,
    LiveStatsPort, QueryLogRepository, RewriteRepository, SnapshotInfo,
};
use bastion_dns_domain::{
    BlocklistRefresh, BlocklistSource, ClientActivity, ClientDomainRule, ClientSettings, Config,
    CustomFilter, DomainError, FilterKind, HourlyBucket, LiveCounters, QueryLogEntry,
    QueryLogPage, QueryLogSummary, RecordType, Rewrite, RuleKind,
};
use std::collections::{HashMap, HashSet};
use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

// ============================================================================
// Mock BlocklistRepository
// ============================================================================

#[derive(Clone, Default)]
pub struct MockBlocklistRepository {
    sources: Arc<RwLock<Vec<BlocklistSource>>>,
    domains: Arc<RwLock<HashMap<i64, Vec<String>>>>,
    refreshes: Arc<RwLock<Vec<BlocklistRefresh>>>,
    failing_stores: Arc<RwLock<HashSet<i64>>>,
    next_id: Arc<AtomicU64>,
}

impl MockBlocklistRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_source(&self, name: &str, url: &str, enabled: bool) -> i64 {
        let mut source = BlocklistSource::new(
            Arc::from(name),
            Arc::from(url),
            Default::default(),
            enabled,
        );
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) as i64 + 1;
        source.id = Some(id);
        self.sources.write().await.push(source);
        id
    }

    pub async fn stored_domains(&self, id: i64) -> Vec<String> {
        self.domains.read().await.get(&id).cloned().unwrap_or_default()
    }

    pub async fn count_sources(&self) -> usize {
        self.sources.read().await.len()
    }

    pub async fn refreshes(&self) -> Vec<BlocklistRefresh> {
        self.refreshes.read().await.clone()
    }

    /// Makes `replace_domains` fail for one source.
    pub async fn fail_replace_domains(&self, id: i64) {
        self.failing_stores.write().await.insert(id);
    }
}

#[async_trait]
impl BlocklistRepository for MockBlocklistRepository {
    async fn create(&self, mut source: BlocklistSource) -> Result<BlocklistSource, DomainError> {
        let mut sources = self.sources.write().await;
        if sources.iter().any(|s| s.url == source.url) {
            return Err(DomainError::Conflict(format!(
                "Blocklist '{}' already exists",
                source.url
            )));
        }
        source.id = Some(self.next_id.fetch_add(1, Ordering::Relaxed) as i64 + 1);
        sources.push(source.clone());
        Ok(source)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<BlocklistSource>, DomainError> {
        Ok(self
            .sources
            .read()
            .await
            .iter()
            .find(|s| s.id == Some(id))
            .cloned())
    }

    async fn get_all(&self) -> Result<Vec<BlocklistSource>, DomainError> {
        Ok(self.sources.read().await.clone())
    }

    async fn get_enabled(&self) -> Result<Vec<BlocklistSource>, DomainError> {
        Ok(self
            .sources
            .read()
            .await
            .iter()
            .filter(|s| s.enabled)
            .cloned()
            .collect())
    }

    async fn update(&self, source: BlocklistSource) -> Result<BlocklistSource, DomainError> {
        let mut sources = self.sources.write().await;
        let slot = sources
            .iter_mut()
            .find(|s| s.id == source.id)
            .ok_or_else(|| DomainError::NotFound("Blocklist not found".to_string()))?;
        *slot = source.clone();
        Ok(source)
    }

    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        let mut sources = self.sources.write().await;
        let before = sources.len();
        sources.retain(|s| s.id != Some(id));
        if sources.len() == before {
            return Err(DomainError::NotFound(format!("Blocklist {} not found", id)));
        }
        self.domains.write().await.remove(&id);
        Ok(())
    }

    async fn replace_domains(&self, source_id: i64, domains: &[String]) -> Result<(), DomainError> {
        if self.failing_stores.read().await.contains(&source_id) {
            return Err(DomainError::DatabaseError("disk I/O error".to_string()));
        }
        self.domains
            .write()
            .await
            .insert(source_id, domains.to_vec());
        Ok(())
    }

    async fn record_refresh(&self, refresh: &BlocklistRefresh) -> Result<(), DomainError> {
        let mut sources = self.sources.write().await;
        if let Some(source) = sources.iter_mut().find(|s| s.id == Some(refresh.source_id)) {
            source.domain_count = refresh.domain_count;
            source.last_error = refresh.error.as_deref().map(Arc::from);
        }
        self.refreshes.write().await.push(refresh.clone());
        Ok(())
    }

    async fn enabled_domains(&self) -> Result<Vec<String>, DomainError> {
        let enabled: HashSet<i64> = self
            .sources
            .read()
            .await
            .iter()
            .filter(|s| s.enabled)
            .filter_map(|s| s.id)
            .collect();
        let domains = self.domains.read().await;
        let mut all: Vec<String> = domains
            .iter()
            .filter(|(id, _)| enabled.contains(id))
            .flat_map(|(_, d)| d.iter().cloned())
            .collect();
        all.sort();
        all.dedup();
        Ok(all)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.sources.read().await.len() as u64)
    }
}

// ============================================================================
// Mock BlocklistFetcher
// ============================================================================

#[derive(Clone, Default)]
pub struct MockBlocklistFetcher {
    responses: Arc<RwLock<HashMap<String, Result<Vec<String>, String>>>>,
}

impl MockBlocklistFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_domains(&self, url: &str, domains: Vec<&str>) {
        self.responses.write().await.insert(
            url.to_string(),
            Ok(domains.into_iter().map(String::from).collect()),
        );
    }

    pub async fn set_failure(&self, url: &str, message: &str) {
        self.responses
            .write()
            .await
            .insert(url.to_string(), Err(message.to_string()));
    }
}

#[async_trait]
impl BlocklistFetcher for MockBlocklistFetcher {
    async fn fetch(&self, source: &BlocklistSource) -> Result<Vec<String>, DomainError> {
        match self.responses.read().await.get(source.url.as_ref()) {
            Some(Ok(domains)) => Ok(domains.clone()),
            Some(Err(message)) => Err(DomainError::BlocklistFetchError(message.clone())),
            None => Err(DomainError::BlocklistFetchError(format!(
                "HTTP 404 for {}",
                source.url
            ))),
        }
    }
}

// ============================================================================
// Mock CustomFilterRepository
// ============================================================================

#[derive(Clone, Default)]
pub struct MockCustomFilterRepository {
    filters: Arc<RwLock<Vec<CustomFilter>>>,
    next_id: Arc<AtomicU64>,
}

impl MockCustomFilterRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.filters.read().await.len()
    }
}

#[async_trait]
impl CustomFilterRepository for MockCustomFilterRepository {
    async fn create(&self, mut filter: CustomFilter) -> Result<CustomFilter, DomainError> {
        let mut filters = self.filters.write().await;
        if filters
            .iter()
            .any(|f| f.domain == filter.domain && f.kind == filter.kind)
        {
            return Err(DomainError::Conflict(format!(
                "Filter '{}' already exists",
                filter.domain
            )));
        }
        filter.id = Some(self.next_id.fetch_add(1, Ordering::Relaxed) as i64 + 1);
        filters.push(filter.clone());
        Ok(filter)
    }

    async fn get_all(&self) -> Result<Vec<CustomFilter>, DomainError> {
        Ok(self.filters.read().await.clone())
    }

    async fn get_by_kind(&self, kind: FilterKind) -> Result<Vec<CustomFilter>, DomainError> {
        Ok(self
            .filters
            .read()
            .await
            .iter()
            .filter(|f| f.kind == kind)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        let mut filters = self.filters.write().await;
        let before = filters.len();
        filters.retain(|f| f.id != Some(id));
        if filters.len() == before {
            return Err(DomainError::NotFound(format!("Filter {} not found", id)));
        }
        Ok(())
    }

    async fn delete_by_domain(&self, domain: &str, kind: FilterKind) -> Result<u64, DomainError> {
        let mut filters = self.filters.write().await;
        let before = filters.len();
        filters.retain(|f| !(f.domain.as_ref() == domain && f.kind == kind));
        Ok((before - filters.len()) as u64)
    }
}

// ============================================================================
// Mock RewriteRepository
// ============================================================================

#[derive(Clone, Default)]
pub struct MockRewriteRepository {
    rewrites: Arc<RwLock<Vec<Rewrite>>>,
    next_id: Arc<AtomicU64>,
}

impl MockRewriteRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RewriteRepository for MockRewriteRepository {
    async fn create(&self, mut rewrite: Rewrite) -> Result<Rewrite, DomainError> {
        rewrite.id = Some(self.next_id.fetch_add(1, Ordering::Relaxed) as i64 + 1);
        self.rewrites.write().await.push(rewrite.clone());
        Ok(rewrite)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Rewrite>, DomainError> {
        Ok(self
            .rewrites
            .read()
            .await
            .iter()
            .find(|r| r.id == Some(id))
            .cloned())
    }

    async fn get_all(&self) -> Result<Vec<Rewrite>, DomainError> {
        Ok(self.rewrites.read().await.clone())
    }

    async fn get_enabled(&self) -> Result<Vec<Rewrite>, DomainError> {
        Ok(self
            .rewrites
            .read()
            .await
            .iter()
            .filter(|r| r.enabled)
            .cloned()
            .collect())
    }

    async fn update(&self, rewrite: Rewrite) -> Result<Rewrite, DomainError> {
        let mut rewrites = self.rewrites.write().await;
        let slot = rewrites
            .iter_mut()
            .find(|r| r.id == rewrite.id)
            .ok_or_else(|| DomainError::NotFound("Rewrite not found".to_string()))?;
        *slot = rewrite.clone();
        Ok(rewrite)
    }

    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        let mut rewrites = self.rewrites.write().await;
        let before = rewrites.len();
        rewrites.retain(|r| r.id != Some(id));
        if rewrites.len() == before {
            return Err(DomainError::NotFound(format!("Rewrite {} not found", id)));
        }
        Ok(())
    }
}

// ============================================================================
// Mock ClientSettingsRepository
// ============================================================================

#[derive(Clone, Default)]
pub struct MockClientSettingsRepository {
    settings: Arc<RwLock<HashMap<IpAddr, ClientSettings>>>,
}

impl MockClientSettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientSettingsRepository for MockClientSettingsRepository {
    async fn get(&self, client_ip: IpAddr) -> Result<Option<ClientSettings>, DomainError> {
        Ok(self.settings.read().await.get(&client_ip).cloned())
    }

    async fn get_banned(&self) -> Result<Vec<ClientSettings>, DomainError> {
        Ok(self
            .settings
            .read()
            .await
            .values()
            .filter(|s| s.blocked)
            .cloned()
            .collect())
    }

    async fn ban(
        &self,
        client_ip: IpAddr,
        reason: Option<String>,
        client_name: Option<String>,
    ) -> Result<ClientSettings, DomainError> {
        let settings = ClientSettings {
            client_ip,
            client_name: client_name.map(|n| Arc::from(n.as_str())),
            blocked: true,
            block_reason: reason.map(|r| Arc::from(r.as_str())),
            blocked_at: Some("2026-01-01 00:00:00".to_string()),
            updated_at: Some("2026-01-01 00:00:00".to_string()),
        };
        self.settings
            .write()
            .await
            .insert(client_ip, settings.clone());
        Ok(settings)
    }

    async fn unban(&self, client_ip: IpAddr) -> Result<ClientSettings, DomainError> {
        let mut settings = self.settings.write().await;
        let entry = settings
            .get_mut(&client_ip)
            .ok_or_else(|| DomainError::NotFound(format!("Client {} not found", client_ip)))?;
        entry.blocked = false;
        entry.block_reason = None;
        entry.blocked_at = None;
        Ok(entry.clone())
    }
}

// ============================================================================
// Mock ClientRuleRepository
// ============================================================================

#[derive(Clone, Default)]
pub struct MockClientRuleRepository {
    rules: Arc<RwLock<Vec<ClientDomainRule>>>,
    next_id: Arc<AtomicU64>,
}

impl MockClientRuleRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientRuleRepository for MockClientRuleRepository {
    async fn create(&self, mut rule: ClientDomainRule) -> Result<ClientDomainRule, DomainError> {
        let mut rules = self.rules.write().await;
        if rules.iter().any(|r| {
            r.client_ip == rule.client_ip && r.domain == rule.domain && r.kind == rule.kind
        }) {
            return Err(DomainError::Conflict("Client rule already exists".to_string()));
        }
        rule.id = Some(self.next_id.fetch_add(1, Ordering::Relaxed) as i64 + 1);
        rules.push(rule.clone());
        Ok(rule)
    }

    async fn get_all(&self) -> Result<Vec<ClientDomainRule>, DomainError> {
        Ok(self.rules.read().await.clone())
    }

    async fn get_for_client(
        &self,
        client_ip: IpAddr,
    ) -> Result<Vec<ClientDomainRule>, DomainError> {
        Ok(self
            .rules
            .read()
            .await
            .iter()
            .filter(|r| r.client_ip == client_ip)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: i64) -> Result<ClientDomainRule, DomainError> {
        let mut rules = self.rules.write().await;
        let pos = rules
            .iter()
            .position(|r| r.id == Some(id))
            .ok_or_else(|| DomainError::NotFound(format!("Client rule {} not found", id)))?;
        Ok(rules.remove(pos))
    }

    async fn delete_by_details(
        &self,
        client_ip: IpAddr,
        domain: &str,
        kind: RuleKind,
    ) -> Result<u64, DomainError> {
        let mut rules = self.rules.write().await;
        let before = rules.len();
        rules.retain(|r| {
            !(r.client_ip == client_ip && r.domain.as_ref() == domain && r.kind == kind)
        });
        Ok((before - rules.len()) as u64)
    }
}

// ============================================================================
// Mock QueryLogRepository
// ============================================================================

#[derive(Clone, Default)]
pub struct MockQueryLogRepository {
    entries: Arc<Mutex<Vec<QueryLogEntry>>>,
    activity: Arc<Mutex<Vec<ClientActivity>>>,
    last_page_request: Arc<Mutex<Option<(u32, u32)>>>,
    dropped: Arc<AtomicU64>,
}

impl MockQueryLogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_activity(&self, activity: Vec<ClientActivity>) {
        *self.activity.lock().unwrap() = activity;
    }

    pub fn last_page_request(&self) -> Option<(u32, u32)> {
        *self.last_page_request.lock().unwrap()
    }

    pub fn set_dropped(&self, dropped: u64) {
        self.dropped.store(dropped, Ordering::Relaxed);
    }

    pub fn logged(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

#[async_trait]
impl QueryLogRepository for MockQueryLogRepository {
    fn log_query(&self, entry: QueryLogEntry) {
        self.entries.lock().unwrap().push(entry);
    }

    fn dropped_entries(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    async fn get_page(&self, page: u32, limit: u32) -> Result<QueryLogPage, DomainError> {
        *self.last_page_request.lock().unwrap() = Some((page, limit));
        let entries = self.entries.lock().unwrap();
        let start = ((page - 1) * limit) as usize;
        Ok(QueryLogPage {
            entries: entries
                .iter()
                .rev()
                .skip(start)
                .take(limit as usize)
                .cloned()
                .collect(),
            total: entries.len() as u64,
            page,
            limit,
        })
    }

    async fn summary(&self, _top_n: u32) -> Result<QueryLogSummary, DomainError> {
        let entries = self.entries.lock().unwrap();
        Ok(QueryLogSummary {
            total_24h: entries.len() as u64,
            blocked_24h: entries.iter().filter(|e| e.blocked).count() as u64,
            queries_last_5m: entries.len() as u64,
            ..Default::default()
        })
    }

    async fn client_activity(&self, limit: u32) -> Result<Vec<ClientActivity>, DomainError> {
        Ok(self
            .activity
            .lock()
            .unwrap()
            .iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn delete_older_than(&self, _days: u32) -> Result<u64, DomainError> {
        Ok(0)
    }
}

// ============================================================================
// Mock LiveStatsPort
// ============================================================================

#[derive(Default)]
pub struct MockLiveStats {
    pub counters: LiveCounters,
    pub requested_hours: AtomicU32,
}

impl LiveStatsPort for MockLiveStats {
    fn counters(&self) -> LiveCounters {
        self.counters
    }

    fn hourly(&self, hours: u32) -> Vec<HourlyBucket> {
        self.requested_hours.store(hours, Ordering::Relaxed);
        (0..hours as i64)
            .map(|i| HourlyBucket {
                hour_start: i * 3600,
                total: 0,
                blocked: 0,
            })
            .collect()
    }
}

// ============================================================================
// Mock FilterEnginePort
// ============================================================================

#[derive(Default)]
pub struct MockFilterEngine {
    reloads: AtomicU32,
    fail_reload: AtomicBool,
    blocked_domains: Mutex<HashSet<String>>,
    client_blocked: Mutex<HashSet<(IpAddr, String)>>,
    banned: Mutex<HashSet<IpAddr>>,
    invalidated: Mutex<Vec<IpAddr>>,
    blocking_enabled: AtomicBool,
}

impl MockFilterEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reload_count(&self) -> u32 {
        self.reloads.load(Ordering::Relaxed)
    }

    pub fn set_fail_reload(&self, fail: bool) {
        self.fail_reload.store(fail, Ordering::Relaxed);
    }

    pub fn block_domain(&self, domain: &str) {
        self.blocked_domains
            .lock()
            .unwrap()
            .insert(domain.to_string());
    }

    pub fn block_for_client(&self, ip: IpAddr, domain: &str) {
        self.client_blocked
            .lock()
            .unwrap()
            .insert((ip, domain.to_string()));
    }

    pub fn ban(&self, ip: IpAddr) {
        self.banned.lock().unwrap().insert(ip);
    }

    pub fn blocking_enabled(&self) -> bool {
        self.blocking_enabled.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl FilterEnginePort for MockFilterEngine {
    fn decide(&self, _client_ip: IpAddr, _domain: &str, _query_type: RecordType) -> FilterDecision {
        FilterDecision::Forward
    }

    fn is_globally_blocked(&self, domain: &str) -> bool {
        self.blocked_domains.lock().unwrap().contains(domain)
    }

    fn is_client_blocked(&self, client_ip: IpAddr, domain: &str) -> bool {
        self.client_blocked
            .lock()
            .unwrap()
            .contains(&(client_ip, domain.to_string()))
    }

    fn is_client_banned(&self, client_ip: IpAddr) -> bool {
        self.banned.lock().unwrap().contains(&client_ip)
    }

    async fn reload(&self) -> Result<(), DomainError> {
        self.reloads.fetch_add(1, Ordering::Relaxed);
        if self.fail_reload.load(Ordering::Relaxed) {
            return Err(DomainError::StoreUnavailable("database is locked".to_string()));
        }
        Ok(())
    }

    async fn invalidate_client(&self, client_ip: IpAddr) -> Result<(), DomainError> {
        self.invalidated.lock().unwrap().push(client_ip);
        Ok(())
    }

    fn snapshot_info(&self) -> SnapshotInfo {
        SnapshotInfo::default()
    }

    fn set_blocking_enabled(&self, enabled: bool) {
        self.blocking_enabled.store(enabled, Ordering::Relaxed);
    }
}

// ============================================================================
// Mock ConfigRepository / ConfigObserver
// ============================================================================

#[derive(Default)]
pub struct MockConfigRepository {
    config: RwLock<Config>,
    saves: AtomicU32,
}

impl MockConfigRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save_count(&self) -> u32 {
        self.saves.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ConfigRepository for MockConfigRepository {
    async fn get_config(&self) -> Result<Config, DomainError> {
        Ok(self.config.read().await.clone())
    }

    async fn save_config(&self, config: &Config) -> Result<(), DomainError> {
        self.saves.fetch_add(1, Ordering::Relaxed);
        *self.config.write().await = config.clone();
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingObserver {
    pub seen_upstreams: Mutex<Vec<Vec<String>>>,
}

impl ConfigObserver for RecordingObserver {
    fn config_changed(&self, config: &Config) {
        self.seen_upstreams
            .lock()
            .unwrap()
            .push(config.dns.upstream_servers.clone());
    }
}
