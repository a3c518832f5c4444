use crate::ports::LiveStatsPort;
use bastion_dns_domain::HourlyBucket;
use std::sync::Arc;

pub const MIN_HOURS: u32 = 1;
pub const MAX_HOURS: u32 = 168;

pub struct GetQueryHistoryUseCase {
    stats: Arc<dyn LiveStatsPort>,
}

impl GetQueryHistoryUseCase {
    pub fn new(stats: Arc<dyn LiveStatsPort>) -> Self {
        Self { stats }
    }

    /// Hourly buckets of the look-back window, `hours` clamped to `[1, 168]`.
    pub fn execute(&self, hours: u32) -> Vec<HourlyBucket> {
        self.stats.hourly(Self::clamp(hours))
    }

    pub fn clamp(hours: u32) -> u32 {
        hours.clamp(MIN_HOURS, MAX_HOURS)
    }
}
