use super::cache::AnswerCache;
use super::metrics::QueryMetrics;
use super::upstream::UpstreamForwarder;
use super::wire::{self, InboundPacket, ParsedQuery};
use arc_swap::ArcSwap;
use bastion_dns_application::ports::{
    ConfigObserver, FilterDecision, FilterEnginePort, QueryLogRepository,
};
use bastion_dns_domain::config::BlockingMode;
use bastion_dns_domain::{BlockReason, Config, DomainError, QueryLogEntry, QueryStatus};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Protocol a query arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Udp,
    Tcp,
}

/// Answer settings that can change at runtime.
#[derive(Debug, Clone)]
struct AnswerSettings {
    blocking_mode: BlockingMode,
    rewrite_ttl: u32,
    blocked_ttl: u32,
    query_logging: bool,
}

impl AnswerSettings {
    fn from_config(config: &Config) -> Self {
        Self {
            blocking_mode: config.dns.blocking_mode,
            rewrite_ttl: config.dns.rewrite_ttl,
            blocked_ttl: config.dns.blocked_ttl,
            query_logging: config.database.query_logging,
        }
    }
}

struct Resolution {
    bytes: Vec<u8>,
    status: QueryStatus,
    upstream: Option<Arc<str>>,
    block_reason: Option<BlockReason>,
    cached: bool,
}

impl Resolution {
    fn new(bytes: Vec<u8>, status: QueryStatus) -> Self {
        Self {
            bytes,
            status,
            upstream: None,
            block_reason: None,
            cached: false,
        }
    }
}

/// Resolves one inbound query: parse, decide, answer, record.
pub struct QueryHandler {
    engine: Arc<dyn FilterEnginePort>,
    forwarder: Arc<UpstreamForwarder>,
    query_log: Arc<dyn QueryLogRepository>,
    metrics: QueryMetrics,
    cache: Option<Arc<AnswerCache>>,
    settings: ArcSwap<AnswerSettings>,
}

impl QueryHandler {
    pub fn new(
        engine: Arc<dyn FilterEnginePort>,
        forwarder: Arc<UpstreamForwarder>,
        query_log: Arc<dyn QueryLogRepository>,
        metrics: QueryMetrics,
        config: &Config,
    ) -> Self {
        Self {
            engine,
            forwarder,
            query_log,
            metrics,
            cache: None,
            settings: ArcSwap::from_pointee(AnswerSettings::from_config(config)),
        }
    }

    /// Reuse forwarded answers through `cache`.
    pub fn with_cache(mut self, cache: Arc<AnswerCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn metrics(&self) -> &QueryMetrics {
        &self.metrics
    }

    /// Answer bytes for `packet`, or `None` when the packet is dropped.
    pub async fn handle(&self, packet: &[u8], client: IpAddr, protocol: Protocol) -> Option<Vec<u8>> {
        let query = match wire::parse_query(packet) {
            Ok(InboundPacket::Query(query)) => query,
            Ok(InboundPacket::NoQuestion(message)) => {
                debug!(client = %client, "Query without question");
                return wire::formerr(&message)
                    .map_err(|e| warn!(error = %e, "Failed to build FORMERR"))
                    .ok();
            }
            Err(e) => {
                debug!(client = %client, error = %e, "Dropping malformed packet");
                return None;
            }
        };

        let client = client.to_canonical();
        let start = Instant::now();
        let settings = self.settings.load();

        let resolution = match self.resolve(&query, packet, client, &settings).await {
            Ok(resolution) => resolution,
            Err(e) => {
                warn!(domain = %query.domain, error = %e, "Failed to build answer");
                Resolution::new(wire::servfail(&query).ok()?, QueryStatus::Error)
            }
        };

        let bytes = if protocol == Protocol::Udp && resolution.bytes.len() > query.max_payload {
            debug!(
                domain = %query.domain,
                size = resolution.bytes.len(),
                max_payload = query.max_payload,
                "Answer exceeds UDP payload, truncating"
            );
            wire::truncated(&query).ok()?
        } else {
            resolution.bytes
        };

        let latency_ms = start.elapsed().as_millis() as u64;
        self.metrics.record(resolution.status, latency_ms);

        if settings.query_logging {
            self.query_log.log_query(
                QueryLogEntry::new(
                    client,
                    Arc::from(query.domain.as_str()),
                    query.query_type,
                    resolution.status,
                    latency_ms,
                )
                .with_upstream(resolution.upstream)
                .with_block_reason(resolution.block_reason)
                .with_cached(resolution.cached),
            );
        }

        Some(bytes)
    }

    async fn resolve(
        &self,
        query: &ParsedQuery,
        packet: &[u8],
        client: IpAddr,
        settings: &AnswerSettings,
    ) -> Result<Resolution, DomainError> {
        match self.engine.decide(client, &query.domain, query.query_type) {
            FilterDecision::Block(reason) => {
                debug!(client = %client, domain = %query.domain, reason = %reason, "Query blocked");
                let bytes = wire::blocked(query, settings.blocking_mode, settings.blocked_ttl)?;
                Ok(Resolution {
                    block_reason: Some(reason),
                    ..Resolution::new(bytes, QueryStatus::Blocked)
                })
            }
            FilterDecision::Rewrite(rewrite) => Ok(Resolution::new(
                wire::rewrite(
                    query,
                    rewrite.record_type,
                    &rewrite.answer,
                    settings.rewrite_ttl,
                )?,
                QueryStatus::Rewritten,
            )),
            FilterDecision::Forward => self.forward(query, packet).await,
        }
    }

    async fn forward(&self, query: &ParsedQuery, packet: &[u8]) -> Result<Resolution, DomainError> {
        let cache = self.cache.as_deref().filter(|cache| cache.is_enabled());
        if let Some(cache) = cache {
            let hit = cache.get(&query.domain, query.query_type, query.id);
            self.metrics.record_cache_lookup(hit.is_some());
            if let Some(bytes) = hit {
                debug!(domain = %query.domain, "Answered from cache");
                return Ok(Resolution {
                    cached: true,
                    ..Resolution::new(bytes, QueryStatus::Forwarded)
                });
            }
        }

        match self.forwarder.forward(packet).await {
            Ok(answer) => {
                if let Some(cache) = cache {
                    cache.insert(&query.domain, query.query_type, &answer.bytes);
                }
                Ok(Resolution {
                    upstream: Some(answer.upstream),
                    ..Resolution::new(answer.bytes, QueryStatus::Forwarded)
                })
            }
            Err(e) => {
                warn!(domain = %query.domain, error = %e, "Upstream resolution failed");
                Ok(Resolution::new(wire::servfail(query)?, QueryStatus::Error))
            }
        }
    }
}

impl ConfigObserver for QueryHandler {
    fn config_changed(&self, config: &Config) {
        self.settings
            .store(Arc::new(AnswerSettings::from_config(config)));
    }
}
