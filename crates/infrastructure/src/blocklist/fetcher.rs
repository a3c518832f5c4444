use super::parser::parse_list_text;
use async_trait::async_trait;
use bastion_dns_application::ports::BlocklistFetcher;
use bastion_dns_domain::{BlocklistSource, DomainError};
use std::time::Duration;
use tracing::{debug, instrument};

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Downloads blocklists over HTTP(S) and parses them according to their
/// declared format.
pub struct HttpBlocklistFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpBlocklistFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            timeout: FETCH_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn fetch_text(&self, url: &str) -> Result<String, DomainError> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| DomainError::BlocklistFetchError(format!("fetch error for {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(DomainError::BlocklistFetchError(format!(
                "HTTP {} for {}",
                response.status().as_u16(),
                url
            )));
        }

        response
            .text()
            .await
            .map_err(|e| DomainError::BlocklistFetchError(format!("read error for {}: {}", url, e)))
    }
}

#[async_trait]
impl BlocklistFetcher for HttpBlocklistFetcher {
    #[instrument(skip(self, source), fields(url = %source.url))]
    async fn fetch(&self, source: &BlocklistSource) -> Result<Vec<String>, DomainError> {
        let text = self.fetch_text(&source.url).await?;
        let format = source.format;

        let domains = tokio::task::spawn_blocking(move || parse_list_text(&text, format))
            .await
            .map_err(|e| DomainError::BlocklistFetchError(format!("parse task failed: {}", e)))?;

        debug!(count = domains.len(), "Blocklist parsed");
        Ok(domains)
    }
}
