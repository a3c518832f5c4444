use bastion_dns_application::ports::LiveStatsPort;
use bastion_dns_domain::{HourlyBucket, LiveCounters, QueryStatus};
use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Hours of history kept in memory.
pub const HISTORY_HOURS: u32 = 168;

const SECS_PER_HOUR: i64 = 3600;

#[derive(Default)]
struct HourCounts {
    total: AtomicU64,
    blocked: AtomicU64,
}

/// Live query counters since process start.
///
/// Counters are plain atomics; hourly buckets live in a `DashMap` keyed by
/// the hour's start timestamp and are pruned past [`HISTORY_HOURS`].
#[derive(Clone)]
pub struct QueryMetrics {
    total: Arc<AtomicU64>,
    blocked: Arc<AtomicU64>,
    forwarded: Arc<AtomicU64>,
    rewritten: Arc<AtomicU64>,
    errors: Arc<AtomicU64>,
    cache_hits: Arc<AtomicU64>,
    cache_misses: Arc<AtomicU64>,
    total_latency_ms: Arc<AtomicU64>,
    hourly: Arc<DashMap<i64, HourCounts, FxBuildHasher>>,
    started: Instant,
}

impl Default for QueryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryMetrics {
    pub fn new() -> Self {
        Self {
            total: Arc::new(AtomicU64::new(0)),
            blocked: Arc::new(AtomicU64::new(0)),
            forwarded: Arc::new(AtomicU64::new(0)),
            rewritten: Arc::new(AtomicU64::new(0)),
            errors: Arc::new(AtomicU64::new(0)),
            cache_hits: Arc::new(AtomicU64::new(0)),
            cache_misses: Arc::new(AtomicU64::new(0)),
            total_latency_ms: Arc::new(AtomicU64::new(0)),
            hourly: Arc::new(DashMap::with_hasher(FxBuildHasher)),
            started: Instant::now(),
        }
    }

    /// Count one answered query.
    pub fn record(&self, status: QueryStatus, latency_ms: u64) {
        self.record_at(status, latency_ms, chrono::Utc::now().timestamp());
    }

    /// Count one answer-cache lookup on the forward path.
    pub fn record_cache_lookup(&self, hit: bool) {
        let counter = if hit {
            &self.cache_hits
        } else {
            &self.cache_misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn record_at(&self, status: QueryStatus, latency_ms: u64, now_secs: i64) {
        self.total.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ms.fetch_add(latency_ms, Ordering::Relaxed);

        let counter = match status {
            QueryStatus::Blocked => &self.blocked,
            QueryStatus::Forwarded => &self.forwarded,
            QueryStatus::Rewritten => &self.rewritten,
            QueryStatus::Error => &self.errors,
        };
        counter.fetch_add(1, Ordering::Relaxed);

        let hour = hour_start(now_secs);
        let is_new = {
            let bucket = self.hourly.entry(hour).or_default();
            bucket.total.fetch_add(1, Ordering::Relaxed);
            if status == QueryStatus::Blocked {
                bucket.blocked.fetch_add(1, Ordering::Relaxed);
            }
            bucket.total.load(Ordering::Relaxed) == 1
        };

        if is_new {
            let oldest = hour - (HISTORY_HOURS as i64 - 1) * SECS_PER_HOUR;
            self.hourly.retain(|start, _| *start >= oldest);
        }
    }

    fn hourly_at(&self, hours: u32, now_secs: i64) -> Vec<HourlyBucket> {
        let hours = hours.clamp(1, HISTORY_HOURS) as i64;
        let current = hour_start(now_secs);

        (0..hours)
            .rev()
            .map(|ago| {
                let start = current - ago * SECS_PER_HOUR;
                let (total, blocked) = self
                    .hourly
                    .get(&start)
                    .map(|b| {
                        (
                            b.total.load(Ordering::Relaxed),
                            b.blocked.load(Ordering::Relaxed),
                        )
                    })
                    .unwrap_or((0, 0));
                HourlyBucket {
                    hour_start: start,
                    total,
                    blocked,
                }
            })
            .collect()
    }
}

fn hour_start(secs: i64) -> i64 {
    secs - secs.rem_euclid(SECS_PER_HOUR)
}

impl LiveStatsPort for QueryMetrics {
    fn counters(&self) -> LiveCounters {
        LiveCounters {
            total: self.total.load(Ordering::Relaxed),
            blocked: self.blocked.load(Ordering::Relaxed),
            forwarded: self.forwarded.load(Ordering::Relaxed),
            rewritten: self.rewritten.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            dropped_log_entries: 0,
            total_latency_ms: self.total_latency_ms.load(Ordering::Relaxed),
            uptime_seconds: self.started.elapsed().as_secs(),
        }
    }

    fn hourly(&self, hours: u32) -> Vec<HourlyBucket> {
        self.hourly_at(hours, chrono::Utc::now().timestamp())
    }
}
