use bastion_dns_application::ports::ConfigObserver;
use bastion_dns_domain::{Config, RecordType};
use compact_str::CompactString;
use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Entry cap of the answer cache.
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Period of the background purge of expired answers.
pub const PURGE_INTERVAL: Duration = Duration::from_secs(60);

/// Share of the cap evicted at once when the cache is full, in percent.
const BATCH_EVICTION_PERCENT: usize = 10;

const HEADER_LEN: usize = 12;
const RCODE_NOERROR: u8 = 0;
const RCODE_NXDOMAIN: u8 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    domain: CompactString,
    record_type: RecordType,
}

impl CacheKey {
    #[inline]
    fn new(domain: &str, record_type: RecordType) -> Self {
        Self {
            domain: CompactString::new(domain),
            record_type,
        }
    }
}

struct CachedAnswer {
    bytes: Vec<u8>,
    expires_at: Instant,
}

/// Upstream answers keyed by question, reused until a fixed TTL runs out.
///
/// Only forwarded answers are stored, so filtering decisions are never
/// cached. When full, the entries closest to expiry are evicted in one batch.
pub struct AnswerCache {
    entries: DashMap<CacheKey, CachedAnswer, FxBuildHasher>,
    max_entries: usize,
    enabled: AtomicBool,
    ttl_secs: AtomicU64,
}

impl AnswerCache {
    pub fn new(enabled: bool, ttl: Duration) -> Self {
        Self::with_max_entries(enabled, ttl, DEFAULT_MAX_ENTRIES)
    }

    pub fn with_max_entries(enabled: bool, ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: DashMap::with_hasher(FxBuildHasher),
            max_entries: max_entries.max(1),
            enabled: AtomicBool::new(enabled),
            ttl_secs: AtomicU64::new(ttl.as_secs()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.dns.cache_enabled,
            Duration::from_secs(config.dns.cache_ttl as u64),
        )
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached answer for a normalized question, re-stamped with `id`.
    pub fn get(&self, domain: &str, record_type: RecordType, id: u16) -> Option<Vec<u8>> {
        if !self.is_enabled() {
            return None;
        }

        let key = CacheKey::new(domain, record_type);
        let mut bytes = {
            let entry = self.entries.get(&key)?;
            if entry.expires_at <= Instant::now() {
                return None;
            }
            entry.bytes.clone()
        };
        bytes[..2].copy_from_slice(&id.to_be_bytes());
        Some(bytes)
    }

    /// Stores an upstream answer when it is a complete NOERROR or NXDOMAIN
    /// response.
    pub fn insert(&self, domain: &str, record_type: RecordType, bytes: &[u8]) {
        if !self.is_enabled() || !is_cacheable(bytes) {
            return;
        }
        let ttl = self.ttl_secs.load(Ordering::Relaxed);
        if ttl == 0 {
            return;
        }

        let key = CacheKey::new(domain, record_type);
        if self.entries.len() >= self.max_entries && !self.entries.contains_key(&key) {
            self.evict_batch();
        }

        self.entries.insert(
            key,
            CachedAnswer {
                bytes: bytes.to_vec(),
                expires_at: Instant::now() + Duration::from_secs(ttl),
            },
        );
    }

    fn evict_batch(&self) {
        let evict_count = (self.max_entries * BATCH_EVICTION_PERCENT / 100).max(1);

        let mut candidates: Vec<(CacheKey, Instant)> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().expires_at))
            .collect();
        candidates.sort_by_key(|(_, expires_at)| *expires_at);

        let mut evicted = 0;
        for (key, _) in candidates.into_iter().take(evict_count) {
            if self.entries.remove(&key).is_some() {
                evicted += 1;
            }
        }
        debug!(evicted, "Answer cache full, evicted oldest entries");
    }

    /// Drops expired entries; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        let now = Instant::now();
        self.entries.retain(|_, answer| answer.expires_at > now);
        before.saturating_sub(self.entries.len())
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn set_ttl(&self, ttl: Duration) {
        self.ttl_secs.store(ttl.as_secs(), Ordering::Relaxed);
    }

    pub fn set_enabled(&self, enabled: bool) {
        let previous = self.enabled.swap(enabled, Ordering::Relaxed);
        if previous && !enabled {
            self.clear();
        }
        if previous != enabled {
            info!(enabled, "Answer cache toggled");
        }
    }
}

/// Background purge of expired answers until `cancel` fires.
pub fn spawn_purge_task(
    cache: Arc<AnswerCache>,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_secs = interval.as_secs(), "Answer cache purge started");
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Answer cache purge stopped");
                    return;
                }
                _ = ticker.tick() => {
                    let removed = cache.purge_expired();
                    if removed > 0 {
                        debug!(removed, size = cache.len(), "Expired answers purged");
                    }
                }
            }
        }
    })
}

impl ConfigObserver for AnswerCache {
    fn config_changed(&self, config: &Config) {
        self.set_ttl(Duration::from_secs(config.dns.cache_ttl as u64));
        self.set_enabled(config.dns.cache_enabled);
    }
}

fn is_cacheable(bytes: &[u8]) -> bool {
    if bytes.len() < HEADER_LEN {
        return false;
    }
    let is_response = bytes[2] & 0x80 != 0;
    let truncated = bytes[2] & 0x02 != 0;
    let rcode = bytes[3] & 0x0F;
    is_response && !truncated && matches!(rcode, RCODE_NOERROR | RCODE_NXDOMAIN)
}
