use crate::ports::{BlocklistFetcher, BlocklistRepository, FilterEnginePort};
use bastion_dns_domain::{BlocklistRefresh, BlocklistSource, DomainError};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub refreshed: usize,
    pub failed: usize,
    pub total_domains: u64,
}

/// Downloads every enabled blocklist, stores its domains, then reloads the
/// filter engine.
///
/// A source that fails to download or store keeps its previously stored
/// domains and gets `last_error` set. The engine is reloaded regardless.
pub struct RefreshBlocklistsUseCase {
    repository: Arc<dyn BlocklistRepository>,
    fetcher: Arc<dyn BlocklistFetcher>,
    engine: Arc<dyn FilterEnginePort>,
}

impl RefreshBlocklistsUseCase {
    pub fn new(
        repository: Arc<dyn BlocklistRepository>,
        fetcher: Arc<dyn BlocklistFetcher>,
        engine: Arc<dyn FilterEnginePort>,
    ) -> Self {
        Self {
            repository,
            fetcher,
            engine,
        }
    }

    pub async fn execute(&self) -> Result<RefreshSummary, DomainError> {
        let sources = self.repository.get_enabled().await?;
        info!(sources = sources.len(), "Blocklist refresh started");

        let fetches = sources.iter().map(|source| async move {
            (source, self.fetcher.fetch(source).await)
        });
        let results = join_all(fetches).await;

        let mut summary = RefreshSummary::default();
        for (source, result) in results {
            let Some(source_id) = source.id else {
                continue;
            };
            let stored = match result {
                Ok(domains) => self
                    .repository
                    .replace_domains(source_id, &domains)
                    .await
                    .map(|()| domains.len() as u64),
                Err(e) => Err(e),
            };
            let refresh = match stored {
                Ok(domain_count) => {
                    summary.refreshed += 1;
                    summary.total_domains += domain_count;
                    info!(name = %source.name, domains = domain_count, "Blocklist refreshed");
                    BlocklistRefresh {
                        source_id,
                        domain_count,
                        error: None,
                    }
                }
                Err(e) => {
                    summary.failed += 1;
                    warn!(name = %source.name, url = %source.url, error = %e, "Blocklist refresh failed");
                    Self::failed_refresh(source, source_id, e)
                }
            };
            if let Err(e) = self.repository.record_refresh(&refresh).await {
                warn!(name = %source.name, error = %e, "Failed to record blocklist refresh");
            }
        }

        self.engine.reload().await?;

        info!(
            refreshed = summary.refreshed,
            failed = summary.failed,
            domains = summary.total_domains,
            "Blocklist refresh completed"
        );
        Ok(summary)
    }

    fn failed_refresh(source: &BlocklistSource, source_id: i64, error: DomainError) -> BlocklistRefresh {
        BlocklistRefresh {
            source_id,
            domain_count: source.domain_count,
            error: Some(error.to_string()),
        }
    }
}
