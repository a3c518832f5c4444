use bastion_dns_domain::{
    BlockReason, DomainCount, HourlyBucket, QueryLogEntry, QueryLogPage, RealtimeStats,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LOG_LIMIT: i64 = 50;
pub const DEFAULT_HISTORY_HOURS: i64 = 24;

/// Signed so that out-of-range numbers are clamped rather than rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl LogsQuery {
    pub fn page(&self) -> u32 {
        clamp_u32(self.page.unwrap_or(1))
    }

    pub fn limit(&self) -> u32 {
        clamp_u32(self.limit.unwrap_or(DEFAULT_LOG_LIMIT))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    pub hours: Option<i64>,
}

impl HistoryQuery {
    pub fn hours(&self) -> u32 {
        clamp_u32(self.hours.unwrap_or(DEFAULT_HISTORY_HOURS))
    }
}

fn clamp_u32(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryLogEntryResponse {
    pub id: i64,
    pub timestamp: Option<String>,
    pub client_ip: String,
    pub domain: String,
    pub query_type: String,
    pub status: String,
    pub blocked: bool,
    pub latency_ms: u64,
    pub upstream: Option<String>,
    pub block_reason: Option<BlockReason>,
    pub cached: bool,
}

impl From<QueryLogEntry> for QueryLogEntryResponse {
    fn from(entry: QueryLogEntry) -> Self {
        Self {
            id: entry.id.unwrap_or(0),
            timestamp: entry.timestamp,
            client_ip: entry.client_ip.to_string(),
            domain: entry.domain.to_string(),
            query_type: entry.query_type.to_string(),
            status: entry.status.to_string(),
            blocked: entry.blocked,
            latency_ms: entry.latency_ms,
            upstream: entry.upstream.map(|u| u.to_string()),
            block_reason: entry.block_reason,
            cached: entry.cached,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryLogPageResponse {
    pub entries: Vec<QueryLogEntryResponse>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl From<QueryLogPage> for QueryLogPageResponse {
    fn from(page: QueryLogPage) -> Self {
        Self {
            entries: page.entries.into_iter().map(Into::into).collect(),
            total: page.total,
            page: page.page,
            limit: page.limit,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub total_queries: u64,
    pub blocked_queries: u64,
    pub forwarded_queries: u64,
    pub rewritten_queries: u64,
    pub error_queries: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_hit_rate: f64,
    pub block_percentage: f64,
    pub queries_per_minute: f64,
    pub avg_latency_ms: f64,
    pub active_clients: u64,
    pub total_24h: u64,
    pub blocked_24h: u64,
    pub top_domains: Vec<DomainCount>,
    pub top_blocked: Vec<DomainCount>,
    pub dropped_log_entries: u64,
    pub uptime_seconds: u64,
}

impl From<RealtimeStats> for StatsResponse {
    fn from(stats: RealtimeStats) -> Self {
        let live = stats.live;
        Self {
            total_queries: live.total,
            blocked_queries: live.blocked,
            forwarded_queries: live.forwarded,
            rewritten_queries: live.rewritten,
            error_queries: live.errors,
            cache_hits: live.cache_hits,
            cache_misses: live.cache_misses,
            cache_hit_rate: live.cache_hit_rate(),
            block_percentage: live.block_percentage(),
            queries_per_minute: stats.queries_per_minute,
            avg_latency_ms: stats.summary.avg_latency_ms_1h,
            active_clients: stats.summary.active_clients_1h,
            total_24h: stats.summary.total_24h,
            blocked_24h: stats.summary.blocked_24h,
            top_domains: stats.summary.top_domains,
            top_blocked: stats.summary.top_blocked,
            dropped_log_entries: live.dropped_log_entries,
            uptime_seconds: live.uptime_seconds,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryResponse {
    pub hours: u32,
    pub buckets: Vec<HourlyBucket>,
}
