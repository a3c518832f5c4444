use async_trait::async_trait;
use bastion_dns_application::ports::{BlocklistFetcher, DnsServerControl, DnsServerStatus};
use bastion_dns_domain::{BlocklistSource, DomainError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

// ============================================================================
// Mock DnsServerControl
// ============================================================================

#[derive(Default)]
pub struct MockDnsServer {
    running: AtomicBool,
    starts: AtomicU32,
}

impl MockDnsServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_count(&self) -> u32 {
        self.starts.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl DnsServerControl for MockDnsServer {
    async fn start(&self) -> Result<(), DomainError> {
        if self.running.swap(true, Ordering::AcqRel) {
            return Err(DomainError::ServerAlreadyRunning);
        }
        self.starts.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn stop(&self) -> Result<(), DomainError> {
        if !self.running.swap(false, Ordering::AcqRel) {
            return Err(DomainError::ServerNotRunning);
        }
        Ok(())
    }

    fn status(&self) -> DnsServerStatus {
        let running = self.running.load(Ordering::Acquire);
        DnsServerStatus {
            running,
            bind_address: running.then(|| "127.0.0.1:5353".to_string()),
            started_at: None,
            uptime_seconds: 0,
            upstreams: Vec::new(),
        }
    }
}

// ============================================================================
// Mock BlocklistFetcher
// ============================================================================

#[derive(Clone, Default)]
pub struct MockBlocklistFetcher {
    responses: Arc<RwLock<HashMap<String, Vec<String>>>>,
}

impl MockBlocklistFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_domains(&self, url: &str, domains: &[&str]) {
        self.responses.write().await.insert(
            url.to_string(),
            domains.iter().map(|d| d.to_string()).collect(),
        );
    }
}

#[async_trait]
impl BlocklistFetcher for MockBlocklistFetcher {
    async fn fetch(&self, source: &BlocklistSource) -> Result<Vec<String>, DomainError> {
        self.responses
            .read()
            .await
            .get(source.url.as_ref())
            .cloned()
            .ok_or_else(|| DomainError::BlocklistFetchError(format!("HTTP 404 for {}", source.url)))
    }
}
