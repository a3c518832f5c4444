use super::blocklist::RefreshResponse;
use bastion_dns_application::ports::{DnsServerStatus, SnapshotInfo, UpstreamHealth};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ServerStatusResponse {
    pub running: bool,
    pub bind_address: Option<String>,
    pub started_at: Option<String>,
    pub uptime_seconds: u64,
    pub upstreams: Vec<UpstreamHealth>,
    pub blocking_enabled: bool,
    pub snapshot: SnapshotInfo,
}

impl ServerStatusResponse {
    pub fn new(status: DnsServerStatus, snapshot: SnapshotInfo, blocking_enabled: bool) -> Self {
        Self {
            running: status.running,
            bind_address: status.bind_address,
            started_at: status.started_at,
            uptime_seconds: status.uptime_seconds,
            upstreams: status.upstreams,
            blocking_enabled,
            snapshot,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReloadResponse {
    pub refresh: RefreshResponse,
    pub snapshot: SnapshotInfo,
}
