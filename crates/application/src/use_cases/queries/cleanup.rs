use crate::ports::QueryLogRepository;
use bastion_dns_domain::DomainError;
use std::sync::Arc;

pub struct CleanupOldQueryLogsUseCase {
    repository: Arc<dyn QueryLogRepository>,
}

impl CleanupOldQueryLogsUseCase {
    pub fn new(repository: Arc<dyn QueryLogRepository>) -> Self {
        Self { repository }
    }

    /// Returns the number of deleted entries.
    pub async fn execute(&self, retention_days: u32) -> Result<u64, DomainError> {
        self.repository.delete_older_than(retention_days).await
    }
}
