#![allow(dead_code)]

use async_trait::async_trait;
use bastion_dns_application::ports::{
    BlocklistFetcher, BlocklistRepository, FilterDecision, FilterEnginePort, QueryLogRepository,
    SnapshotInfo,
};
use bastion_dns_domain::{
    BlocklistRefresh, BlocklistSource, ClientActivity, DomainError, ListFormat, QueryLogEntry,
    QueryLogPage, QueryLogSummary, QueryStatus, RecordType,
};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::RwLock;

// ============================================================================
// Mock QueryLogRepository
// ============================================================================

/// Stores entries alongside their age in days.
#[derive(Clone, Default)]
pub struct MockQueryLogRepository {
    entries: Arc<RwLock<Vec<(QueryLogEntry, u32)>>>,
    cleanup_calls: Arc<AtomicU64>,
    should_fail: Arc<AtomicBool>,
}

impl MockQueryLogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(client: &str) -> QueryLogEntry {
        QueryLogEntry::new(
            client.parse().unwrap(),
            Arc::from("example.com"),
            RecordType::A,
            QueryStatus::Forwarded,
            3,
        )
    }

    pub async fn add_recent_log(&self, client: &str) {
        self.entries.write().await.push((Self::entry(client), 0));
    }

    pub async fn add_old_log(&self, client: &str, age_days: u32) {
        self.entries.write().await.push((Self::entry(client), age_days));
    }

    pub async fn count(&self) -> usize {
        self.entries.read().await.len()
    }

    pub fn cleanup_calls(&self) -> u64 {
        self.cleanup_calls.load(Ordering::Relaxed)
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::Relaxed);
    }
}

#[async_trait]
impl QueryLogRepository for MockQueryLogRepository {
    fn log_query(&self, _entry: QueryLogEntry) {}

    async fn get_page(&self, page: u32, limit: u32) -> Result<QueryLogPage, DomainError> {
        Ok(QueryLogPage {
            entries: Vec::new(),
            total: self.entries.read().await.len() as u64,
            page,
            limit,
        })
    }

    async fn summary(&self, _top_n: u32) -> Result<QueryLogSummary, DomainError> {
        Ok(QueryLogSummary::default())
    }

    async fn client_activity(&self, _limit: u32) -> Result<Vec<ClientActivity>, DomainError> {
        Ok(Vec::new())
    }

    async fn delete_older_than(&self, days: u32) -> Result<u64, DomainError> {
        self.cleanup_calls.fetch_add(1, Ordering::Relaxed);
        if self.should_fail.load(Ordering::Relaxed) {
            return Err(DomainError::DatabaseError("disk I/O error".to_string()));
        }
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|(_, age)| *age <= days);
        Ok((before - entries.len()) as u64)
    }
}

// ============================================================================
// Mock BlocklistRepository
// ============================================================================

#[derive(Clone, Default)]
pub struct MockBlocklistRepository {
    sources: Arc<RwLock<Vec<BlocklistSource>>>,
    domains: Arc<RwLock<HashMap<i64, Vec<String>>>>,
}

impl MockBlocklistRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_source(&self, url: &str) -> i64 {
        let mut sources = self.sources.write().await;
        let id = sources.len() as i64 + 1;
        let mut source =
            BlocklistSource::new(Arc::from("list"), Arc::from(url), ListFormat::Domains, true);
        source.id = Some(id);
        sources.push(source);
        id
    }

    pub async fn stored_domains(&self, id: i64) -> Vec<String> {
        self.domains.read().await.get(&id).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl BlocklistRepository for MockBlocklistRepository {
    async fn create(&self, source: BlocklistSource) -> Result<BlocklistSource, DomainError> {
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
        Ok(self.sources.read().await.clone())
    }

    async fn update(&self, source: BlocklistSource) -> Result<BlocklistSource, DomainError> {
        Ok(source)
    }

    async fn delete(&self, _id: i64) -> Result<(), DomainError> {
        Ok(())
    }

    async fn replace_domains(&self, source_id: i64, domains: &[String]) -> Result<(), DomainError> {
        self.domains
            .write()
            .await
            .insert(source_id, domains.to_vec());
        Ok(())
    }

    async fn record_refresh(&self, _refresh: &BlocklistRefresh) -> Result<(), DomainError> {
        Ok(())
    }

    async fn enabled_domains(&self) -> Result<Vec<String>, DomainError> {
        Ok(self
            .domains
            .read()
            .await
            .values()
            .flatten()
            .cloned()
            .collect())
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
    domains: Arc<RwLock<Vec<String>>>,
    call_count: Arc<AtomicU64>,
}

impl MockBlocklistFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_domains(&self, domains: Vec<&str>) {
        *self.domains.write().await = domains.into_iter().map(String::from).collect();
    }

    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl BlocklistFetcher for MockBlocklistFetcher {
    async fn fetch(&self, _source: &BlocklistSource) -> Result<Vec<String>, DomainError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        Ok(self.domains.read().await.clone())
    }
}

// ============================================================================
// Mock FilterEnginePort
// ============================================================================

#[derive(Default)]
pub struct MockFilterEngine {
    reloads: AtomicU64,
}

impl MockFilterEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reload_count(&self) -> u64 {
        self.reloads.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl FilterEnginePort for MockFilterEngine {
    fn decide(&self, _client_ip: IpAddr, _domain: &str, _query_type: RecordType) -> FilterDecision {
        FilterDecision::Forward
    }

    fn is_globally_blocked(&self, _domain: &str) -> bool {
        false
    }

    fn is_client_blocked(&self, _client_ip: IpAddr, _domain: &str) -> bool {
        false
    }

    fn is_client_banned(&self, _client_ip: IpAddr) -> bool {
        false
    }

    async fn reload(&self) -> Result<(), DomainError> {
        self.reloads.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn invalidate_client(&self, _client_ip: IpAddr) -> Result<(), DomainError> {
        Ok(())
    }

    fn snapshot_info(&self) -> SnapshotInfo {
        SnapshotInfo::default()
    }

    fn set_blocking_enabled(&self, _enabled: bool) {}
}
