use crate::ports::QueryLogRepository;
use bastion_dns_domain::{DomainError, QueryLogPage};
use std::sync::Arc;

pub const MIN_LIMIT: u32 = 1;
pub const MAX_LIMIT: u32 = 1_000;

pub struct GetQueryLogUseCase {
    repository: Arc<dyn QueryLogRepository>,
}

impl GetQueryLogUseCase {
    pub fn new(repository: Arc<dyn QueryLogRepository>) -> Self {
        Self { repository }
    }

    /// `page` below 1 becomes 1; `limit` is clamped to `[1, 1000]`.
    pub async fn execute(&self, page: u32, limit: u32) -> Result<QueryLogPage, DomainError> {
        let (page, limit) = Self::clamp(page, limit);
        self.repository.get_page(page, limit).await
    }

    pub fn clamp(page: u32, limit: u32) -> (u32, u32) {
        (page.max(1), limit.clamp(MIN_LIMIT, MAX_LIMIT))
    }
}
