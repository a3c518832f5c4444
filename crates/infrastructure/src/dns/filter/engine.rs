use super::compiler::{build_client_rules, build_snapshot, RuleCompiler};
use super::snapshot::FilterSnapshot;
use arc_swap::ArcSwap;
use async_trait::async_trait;
use bastion_dns_application::ports::{
    ConfigObserver, FilterDecision, FilterEnginePort, SnapshotInfo,
};
use bastion_dns_domain::{normalize_domain_cow, Config, DomainError, RecordType};
use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

/// The Filter Engine.
///
/// All rule state lives in one immutable [`FilterSnapshot`] swapped atomically
/// through `ArcSwap`: decisions load the current pointer and never wait.
/// Reloads and client invalidations serialize on `writer`, so a slow full
/// compile cannot overwrite a newer client update with stale data.
pub struct FilterEngine {
    snapshot: ArcSwap<FilterSnapshot>,
    compiler: RuleCompiler,
    writer: Mutex<()>,
    last_version: AtomicU64,
    blocking_enabled: AtomicBool,
}

impl FilterEngine {
    /// Engine with an empty snapshot (forwards everything until `reload`).
    pub fn new(compiler: RuleCompiler, blocking_enabled: bool) -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(FilterSnapshot::empty()),
            compiler,
            writer: Mutex::new(()),
            last_version: AtomicU64::new(0),
            blocking_enabled: AtomicBool::new(blocking_enabled),
        }
    }

    /// Create the engine and compile the initial snapshot.
    pub async fn load(compiler: RuleCompiler, blocking_enabled: bool) -> Result<Self, DomainError> {
        let engine = Self::new(compiler, blocking_enabled);
        engine.reload().await?;
        Ok(engine)
    }

    /// The snapshot current at the instant of the call.
    pub fn snapshot(&self) -> Arc<FilterSnapshot> {
        self.snapshot.load_full()
    }

    pub fn blocking_enabled(&self) -> bool {
        self.blocking_enabled.load(Ordering::Relaxed)
    }

    fn next_version(&self) -> u64 {
        self.last_version.fetch_add(1, Ordering::AcqRel) + 1
    }
}

#[async_trait]
impl FilterEnginePort for FilterEngine {
    #[inline]
    fn decide(&self, client_ip: IpAddr, domain: &str, query_type: RecordType) -> FilterDecision {
        let domain = normalize_domain_cow(domain);
        self.snapshot.load().decide(
            client_ip.to_canonical(),
            &domain,
            query_type,
            self.blocking_enabled(),
        )
    }

    fn is_globally_blocked(&self, domain: &str) -> bool {
        let domain = normalize_domain_cow(domain);
        self.snapshot.load().global.is_blocked(&domain)
    }

    fn is_client_blocked(&self, client_ip: IpAddr, domain: &str) -> bool {
        let domain = normalize_domain_cow(domain);
        self.snapshot
            .load()
            .is_client_blocked(client_ip.to_canonical(), &domain)
    }

    fn is_client_banned(&self, client_ip: IpAddr) -> bool {
        self.snapshot
            .load()
            .banned
            .contains(&client_ip.to_canonical())
    }

    async fn reload(&self) -> Result<(), DomainError> {
        let _guard = self.writer.lock().await;
        info!("Filter reload started");

        let rules = self.compiler.load_rules().await.map_err(|e| {
            error!(error = %e, "Filter reload failed, keeping previous snapshot");
            e
        })?;

        let version = self.next_version();
        let compiled_at = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let snapshot =
            tokio::task::spawn_blocking(move || build_snapshot(rules, version, Some(compiled_at)))
                .await
                .map_err(|e| DomainError::StoreUnavailable(format!("compile task failed: {}", e)))?;

        let info = snapshot.info();
        self.snapshot.store(Arc::new(snapshot));

        info!(
            version = info.version,
            blocked = info.blocked_domains,
            allowed = info.allowed_domains,
            rewrites = info.rewrites,
            banned = info.banned_clients,
            clients = info.clients_with_rules,
            "Filter reload completed"
        );
        Ok(())
    }

    async fn invalidate_client(&self, client_ip: IpAddr) -> Result<(), DomainError> {
        let client_ip = client_ip.to_canonical();
        let _guard = self.writer.lock().await;

        let (banned, rules) = self.compiler.load_client(client_ip).await?;
        let version = self.next_version();
        let current = self.snapshot.load_full();
        let next = current.with_client(version, client_ip, banned, build_client_rules(&rules));
        self.snapshot.store(Arc::new(next));

        info!(client_ip = %client_ip, version, banned, rules = rules.len(), "Client rules refreshed");
        Ok(())
    }

    fn snapshot_info(&self) -> SnapshotInfo {
        self.snapshot.load().info()
    }

    fn set_blocking_enabled(&self, enabled: bool) {
        let previous = self.blocking_enabled.swap(enabled, Ordering::Relaxed);
        if previous != enabled {
            info!(enabled, "Blocking toggled");
        }
    }
}

impl ConfigObserver for FilterEngine {
    fn config_changed(&self, config: &Config) {
        self.set_blocking_enabled(config.blocking.enabled);
    }
}
