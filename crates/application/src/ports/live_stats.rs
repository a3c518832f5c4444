use bastion_dns_domain::{HourlyBucket, LiveCounters};

/// In-memory counters maintained by the resolver.
pub trait LiveStatsPort: Send + Sync {
    fn counters(&self) -> LiveCounters;

    /// Buckets of the last `hours` clock hours, oldest first, including the
    /// current one. Hours without traffic are zero-filled.
    fn hourly(&self, hours: u32) -> Vec<HourlyBucket>;
}
