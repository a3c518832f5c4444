pub mod transport;

use crate::dns::wire::is_truncated;
use arc_swap::ArcSwap;
use bastion_dns_application::ports::{ConfigObserver, UpstreamHealth};
use bastion_dns_domain::config::root::parse_upstream_addr;
use bastion_dns_domain::{Config, DomainError};
use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use transport::{tcp_exchange, udp_exchange};

/// Cooldown added per consecutive failure.
const COOLDOWN_STEP: Duration = Duration::from_secs(10);
const MAX_COOLDOWN: Duration = Duration::from_secs(300);

/// Answer relayed from an upstream, untouched.
#[derive(Debug, Clone)]
pub struct ForwardedAnswer {
    pub bytes: Vec<u8>,
    pub upstream: Arc<str>,
}

#[derive(Debug, Clone)]
struct Upstream {
    addr: SocketAddr,
    label: Arc<str>,
}

#[derive(Debug, Default, Clone, Copy)]
struct HealthState {
    consecutive_failures: u32,
    cooldown_until: Option<Instant>,
}

impl HealthState {
    fn is_cooling(&self, now: Instant) -> bool {
        self.cooldown_until.is_some_and(|until| until > now)
    }
}

/// Relays queries to the configured upstreams in order.
///
/// A failing upstream is put in cooldown for `failures × 10 s` (capped at
/// 5 minutes). Cooling upstreams are only tried when every upstream is
/// cooling. A truncated UDP answer is retried over TCP to the same upstream.
pub struct UpstreamForwarder {
    upstreams: ArcSwap<Vec<Upstream>>,
    health: DashMap<SocketAddr, HealthState, FxBuildHasher>,
    timeout_ms: AtomicU64,
}

impl UpstreamForwarder {
    pub fn new(servers: &[String], timeout: Duration) -> Result<Self, DomainError> {
        let forwarder = Self {
            upstreams: ArcSwap::from_pointee(Vec::new()),
            health: DashMap::with_hasher(FxBuildHasher),
            timeout_ms: AtomicU64::new(timeout.as_millis().max(1) as u64),
        };
        forwarder.set_upstreams(servers)?;
        Ok(forwarder)
    }

    pub fn from_config(config: &Config) -> Result<Self, DomainError> {
        Self::new(
            &config.dns.upstream_servers,
            Duration::from_millis(config.dns.query_timeout),
        )
    }

    /// Replace the upstream list. Health of servers still listed is kept.
    pub fn set_upstreams(&self, servers: &[String]) -> Result<(), DomainError> {
        let upstreams = servers
            .iter()
            .map(|raw| {
                parse_upstream_addr(raw)
                    .map(|addr| Upstream {
                        addr,
                        label: Arc::from(addr.to_string().as_str()),
                    })
                    .map_err(DomainError::InvalidInput)
            })
            .collect::<Result<Vec<_>, _>>()?;

        if upstreams.is_empty() {
            return Err(DomainError::InvalidInput(
                "at least one upstream server is required".to_string(),
            ));
        }

        self.health
            .retain(|addr, _| upstreams.iter().any(|u| u.addr == *addr));
        info!(upstreams = ?servers, "Upstream servers configured");
        self.upstreams.store(Arc::new(upstreams));
        Ok(())
    }

    pub fn set_timeout(&self, timeout: Duration) {
        self.timeout_ms
            .store(timeout.as_millis().max(1) as u64, Ordering::Relaxed);
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.load(Ordering::Relaxed))
    }

    /// Healthy upstreams in configured order, or every upstream when all are
    /// cooling.
    fn candidates(&self) -> Vec<Upstream> {
        let upstreams = self.upstreams.load();
        let now = Instant::now();
        let healthy: Vec<Upstream> = upstreams
            .iter()
            .filter(|u| !self.health.get(&u.addr).is_some_and(|h| h.is_cooling(now)))
            .cloned()
            .collect();

        if healthy.is_empty() {
            upstreams.iter().cloned().collect()
        } else {
            healthy
        }
    }

    fn mark_success(&self, addr: SocketAddr) {
        if let Some(mut state) = self.health.get_mut(&addr) {
            if state.consecutive_failures > 0 {
                info!(upstream = %addr, "Upstream recovered");
            }
            *state = HealthState::default();
        }
    }

    fn mark_failure(&self, addr: SocketAddr) {
        let mut state = self.health.entry(addr).or_default();
        state.consecutive_failures = state.consecutive_failures.saturating_add(1);
        let cooldown = (COOLDOWN_STEP * state.consecutive_failures).min(MAX_COOLDOWN);
        state.cooldown_until = Some(Instant::now() + cooldown);
        warn!(
            upstream = %addr,
            failures = state.consecutive_failures,
            cooldown_secs = cooldown.as_secs(),
            "Upstream marked unhealthy"
        );
    }

    async fn exchange(&self, upstream: &Upstream, query: &[u8]) -> Result<Vec<u8>, DomainError> {
        let timeout = self.timeout();
        let response = udp_exchange(upstream.addr, query, timeout).await?;
        if !is_truncated(&response.bytes) {
            return Ok(response.bytes);
        }

        debug!(upstream = %upstream.addr, "Truncated UDP answer, retrying over TCP");
        Ok(tcp_exchange(upstream.addr, query, timeout).await?.bytes)
    }

    /// Send `query` to the first upstream that answers.
    ///
    /// # Errors
    ///
    /// * `DomainError::QueryTimeout` - If the last upstream tried timed out
    /// * `DomainError::UpstreamUnavailable` - If every upstream failed otherwise
    pub async fn forward(&self, query: &[u8]) -> Result<ForwardedAnswer, DomainError> {
        let mut last_error = None;

        for upstream in self.candidates() {
            match self.exchange(&upstream, query).await {
                Ok(bytes) => {
                    self.mark_success(upstream.addr);
                    return Ok(ForwardedAnswer {
                        bytes,
                        upstream: upstream.label,
                    });
                }
                Err(e) => {
                    debug!(upstream = %upstream.addr, error = %e, "Upstream attempt failed");
                    self.mark_failure(upstream.addr);
                    last_error = Some(e);
                }
            }
        }

        Err(match last_error {
            Some(DomainError::QueryTimeout) => DomainError::QueryTimeout,
            Some(e) => DomainError::UpstreamUnavailable(e.to_string()),
            None => DomainError::UpstreamUnavailable("no upstream configured".to_string()),
        })
    }

    pub fn health_snapshot(&self) -> Vec<UpstreamHealth> {
        let now = Instant::now();
        self.upstreams
            .load()
            .iter()
            .map(|u| {
                let state = self.health.get(&u.addr).map(|h| *h).unwrap_or_default();
                UpstreamHealth {
                    address: u.label.to_string(),
                    healthy: !state.is_cooling(now),
                    consecutive_failures: state.consecutive_failures,
                    cooldown_remaining_secs: state
                        .cooldown_until
                        .map(|until| until.saturating_duration_since(now).as_secs())
                        .unwrap_or(0),
                }
            })
            .collect()
    }
}

impl ConfigObserver for UpstreamForwarder {
    fn config_changed(&self, config: &Config) {
        self.set_timeout(Duration::from_millis(config.dns.query_timeout));
        if let Err(e) = self.set_upstreams(&config.dns.upstream_servers) {
            warn!(error = %e, "Ignoring invalid upstream list");
        }
    }
}
