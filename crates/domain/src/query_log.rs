use crate::record_type::RecordType;
use serde::Serialize;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use std::sync::Arc;

/// How a query was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    Forwarded,
    Blocked,
    Rewritten,
    /// Upstream timeout or failure; answered with SERVFAIL.
    Error,
}

impl QueryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryStatus::Forwarded => "forwarded",
            QueryStatus::Blocked => "blocked",
            QueryStatus::Rewritten => "rewritten",
            QueryStatus::Error => "error",
        }
    }
}

impl fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forwarded" => Ok(QueryStatus::Forwarded),
            "blocked" => Ok(QueryStatus::Blocked),
            "rewritten" => Ok(QueryStatus::Rewritten),
            "error" => Ok(QueryStatus::Error),
            other => Err(format!("unknown query status '{}'", other)),
        }
    }
}

/// Why a query was blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    ClientBanned,
    ClientRule,
    Blocklist,
}

impl BlockReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockReason::ClientBanned => "client_banned",
            BlockReason::ClientRule => "client_rule",
            BlockReason::Blocklist => "blocklist",
        }
    }
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client_banned" => Ok(BlockReason::ClientBanned),
            "client_rule" => Ok(BlockReason::ClientRule),
            "blocklist" => Ok(BlockReason::Blocklist),
            other => Err(format!("unknown block reason '{}'", other)),
        }
    }
}

/// One answered query. Append-only.
#[derive(Debug, Clone)]
pub struct QueryLogEntry {
    pub id: Option<i64>,
    pub timestamp: Option<String>,
    pub client_ip: IpAddr,
    pub domain: Arc<str>,
    pub query_type: RecordType,
    pub blocked: bool,
    pub latency_ms: u64,
    pub status: QueryStatus,
    pub upstream: Option<Arc<str>>,
    pub block_reason: Option<BlockReason>,
    /// Answered from the upstream answer cache.
    pub cached: bool,
}

impl QueryLogEntry {
    pub fn new(
        client_ip: IpAddr,
        domain: Arc<str>,
        query_type: RecordType,
        status: QueryStatus,
        latency_ms: u64,
    ) -> Self {
        Self {
            id: None,
            timestamp: None,
            client_ip,
            domain,
            query_type,
            blocked: status == QueryStatus::Blocked,
            latency_ms,
            status,
            upstream: None,
            block_reason: None,
            cached: false,
        }
    }

    pub fn with_upstream(mut self, upstream: Option<Arc<str>>) -> Self {
        self.upstream = upstream;
        self
    }

    pub fn with_block_reason(mut self, reason: Option<BlockReason>) -> Self {
        self.block_reason = reason;
        self
    }

    pub fn with_cached(mut self, cached: bool) -> Self {
        self.cached = cached;
        self
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }
}

/// One page of the query log, newest first.
#[derive(Debug, Clone)]
pub struct QueryLogPage {
    pub entries: Vec<QueryLogEntry>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

/// Query counts of one clock hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourlyBucket {
    /// Unix timestamp of the start of the hour.
    pub hour_start: i64,
    pub total: u64,
    pub blocked: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainCount {
    pub domain: String,
    pub count: u64,
}

/// Aggregates computed from the persisted query log.
#[derive(Debug, Clone, Default)]
pub struct QueryLogSummary {
    pub total_24h: u64,
    pub blocked_24h: u64,
    pub queries_last_5m: u64,
    pub avg_latency_ms_1h: f64,
    pub active_clients_1h: u64,
    pub top_domains: Vec<DomainCount>,
    pub top_blocked: Vec<DomainCount>,
}

/// Counters kept in memory since the process started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LiveCounters {
    pub total: u64,
    pub blocked: u64,
    pub forwarded: u64,
    pub rewritten: u64,
    pub errors: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub dropped_log_entries: u64,
    pub total_latency_ms: u64,
    pub uptime_seconds: u64,
}

impl LiveCounters {
    pub fn block_percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.blocked as f64 / self.total as f64 * 100.0
    }

    pub fn avg_latency_ms(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.total_latency_ms as f64 / self.total as f64
    }

    pub fn cache_hit_rate(&self) -> f64 {
        let lookups = self.cache_hits + self.cache_misses;
        if lookups == 0 {
            return 0.0;
        }
        self.cache_hits as f64 / lookups as f64 * 100.0
    }
}

/// Real-time statistics served to the admin API.
#[derive(Debug, Clone)]
pub struct RealtimeStats {
    pub live: LiveCounters,
    pub summary: QueryLogSummary,
    pub queries_per_minute: f64,
}
