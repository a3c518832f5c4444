use super::listener::DnsListener;
use crate::dns::handler::QueryHandler;
use crate::dns::upstream::UpstreamForwarder;
use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use bastion_dns_application::ports::{ConfigRepository, DnsServerControl, DnsServerStatus};
use bastion_dns_domain::config::ServerConfig;
use bastion_dns_domain::DomainError;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{info, warn};

const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(5);

struct RunningServer {
    cancel: CancellationToken,
    tracker: TaskTracker,
}

#[derive(Debug)]
struct ServerInfo {
    local_addr: SocketAddr,
    started_at: String,
    started: Instant,
}

/// Starts and stops the UDP/TCP listeners at runtime.
///
/// The bind address is read from the configuration on every start, so a
/// stop/start cycle picks up a changed `[server]` section.
pub struct DnsServerController {
    handler: Arc<QueryHandler>,
    forwarder: Arc<UpstreamForwarder>,
    config: Arc<dyn ConfigRepository>,
    running: Mutex<Option<RunningServer>>,
    info: ArcSwapOption<ServerInfo>,
    grace_period: Duration,
}

impl DnsServerController {
    pub fn new(
        handler: Arc<QueryHandler>,
        forwarder: Arc<UpstreamForwarder>,
        config: Arc<dyn ConfigRepository>,
    ) -> Self {
        Self {
            handler,
            forwarder,
            config,
            running: Mutex::new(None),
            info: ArcSwapOption::empty(),
            grace_period: DEFAULT_GRACE_PERIOD,
        }
    }

    /// How long `stop` waits for in-flight queries.
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    /// Address the listeners are bound to while running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.info.load().as_ref().map(|info| info.local_addr)
    }

    pub fn is_running(&self) -> bool {
        self.info.load().is_some()
    }
}

fn bind_addr(server: &ServerConfig) -> Result<SocketAddr, DomainError> {
    let ip: IpAddr = server.bind_address.parse().map_err(|_| {
        DomainError::InvalidIpAddress(format!("Invalid bind address '{}'", server.bind_address))
    })?;
    Ok(SocketAddr::new(ip, server.dns_port))
}

#[async_trait]
impl DnsServerControl for DnsServerController {
    async fn start(&self) -> Result<(), DomainError> {
        let mut running = self.running.lock().await;
        if running.is_some() {
            return Err(DomainError::ServerAlreadyRunning);
        }

        let config = self.config.get_config().await?;
        let listener = DnsListener::bind(bind_addr(&config.server)?).await?;
        let local_addr = listener.local_addr();

        let cancel = CancellationToken::new();
        let tracker = TaskTracker::new();
        listener.spawn(Arc::clone(&self.handler), cancel.clone(), &tracker);

        *running = Some(RunningServer { cancel, tracker });
        self.info.store(Some(Arc::new(ServerInfo {
            local_addr,
            started_at: chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            started: Instant::now(),
        })));

        info!(bind_address = %local_addr, "DNS server started");
        Ok(())
    }

    async fn stop(&self) -> Result<(), DomainError> {
        let mut running = self.running.lock().await;
        let server = running.take().ok_or(DomainError::ServerNotRunning)?;
        self.info.store(None);

        server.cancel.cancel();
        server.tracker.close();

        if tokio::time::timeout(self.grace_period, server.tracker.wait())
            .await
            .is_err()
        {
            warn!(
                in_flight = server.tracker.len(),
                grace_secs = self.grace_period.as_secs(),
                "Abandoning in-flight queries after grace period"
            );
        }

        info!("DNS server stopped");
        Ok(())
    }

    fn status(&self) -> DnsServerStatus {
        let info = self.info.load_full();
        DnsServerStatus {
            running: info.is_some(),
            bind_address: info.as_ref().map(|i| i.local_addr.to_string()),
            started_at: info.as_ref().map(|i| i.started_at.clone()),
            uptime_seconds: info.as_ref().map(|i| i.started.elapsed().as_secs()).unwrap_or(0),
            upstreams: self.forwarder.health_snapshot(),
        }
    }
}
