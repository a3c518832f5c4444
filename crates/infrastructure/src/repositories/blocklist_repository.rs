use async_trait::async_trait;
use bastion_dns_application::ports::BlocklistRepository;
use bastion_dns_domain::{BlocklistRefresh, BlocklistSource, DomainError, ListFormat};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{debug, error, instrument};

type BlocklistRow = (
    i64,
    String,
    String,
    i64,
    String,
    i64,
    Option<String>,
    Option<String>,
    String,
    String,
);

const SELECT_COLUMNS: &str = "SELECT id, name, url, enabled, format, domain_count, last_refreshed, last_error, created_at, updated_at FROM blocklists";

/// Rows bound per INSERT when replacing a source's domains.
const INSERT_CHUNK: usize = 400;

pub struct SqliteBlocklistRepository {
    pool: SqlitePool,
}

impl SqliteBlocklistRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_source(row: BlocklistRow) -> BlocklistSource {
        let (
            id,
            name,
            url,
            enabled,
            format,
            domain_count,
            last_refreshed,
            last_error,
            created_at,
            updated_at,
        ) = row;

        BlocklistSource {
            id: Some(id),
            name: Arc::from(name.as_str()),
            url: Arc::from(url.as_str()),
            enabled: enabled != 0,
            format: format.parse().unwrap_or(ListFormat::Auto),
            domain_count: domain_count.max(0) as u64,
            last_refreshed,
            last_error: last_error.map(|e| Arc::from(e.as_str())),
            created_at: Some(created_at),
            updated_at: Some(updated_at),
        }
    }

    fn map_write_error(e: sqlx::Error, url: &str) -> DomainError {
        if e.to_string().contains("UNIQUE constraint failed") {
            DomainError::Conflict(format!("Blocklist with URL '{}' already exists", url))
        } else {
            error!(error = %e, "Failed to write blocklist");
            DomainError::DatabaseError(e.to_string())
        }
    }
}

#[async_trait]
impl BlocklistRepository for SqliteBlocklistRepository {
    #[instrument(skip(self, source), fields(url = %source.url))]
    async fn create(&self, source: BlocklistSource) -> Result<BlocklistSource, DomainError> {
        let now = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

        let result = sqlx::query(
            "INSERT INTO blocklists (name, url, enabled, format, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(source.name.as_ref())
        .bind(source.url.as_ref())
        .bind(if source.enabled { 1i64 } else { 0 })
        .bind(source.format.as_str())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_write_error(e, &source.url))?;

        self.get_by_id(result.last_insert_rowid())
            .await?
            .ok_or_else(|| DomainError::DatabaseError("Failed to fetch created blocklist".to_string()))
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: i64) -> Result<Option<BlocklistSource>, DomainError> {
        let row = sqlx::query_as::<_, BlocklistRow>(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to query blocklist by id");
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(row.map(Self::row_to_source))
    }

    #[instrument(skip(self))]
    async fn get_all(&self) -> Result<Vec<BlocklistSource>, DomainError> {
        let rows = sqlx::query_as::<_, BlocklistRow>(&format!("{} ORDER BY id", SELECT_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to query blocklists");
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(rows.into_iter().map(Self::row_to_source).collect())
    }

    #[instrument(skip(self))]
    async fn get_enabled(&self) -> Result<Vec<BlocklistSource>, DomainError> {
        let rows = sqlx::query_as::<_, BlocklistRow>(&format!(
            "{} WHERE enabled = 1 ORDER BY id",
            SELECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to query enabled blocklists");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(Self::row_to_source).collect())
    }

    #[instrument(skip(self, source), fields(id = ?source.id))]
    async fn update(&self, source: BlocklistSource) -> Result<BlocklistSource, DomainError> {
        let id = source
            .id
            .ok_or_else(|| DomainError::InvalidInput("Blocklist id is required".to_string()))?;
        let now = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

        let result = sqlx::query(
            "UPDATE blocklists SET name = ?, url = ?, enabled = ?, format = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(source.name.as_ref())
        .bind(source.url.as_ref())
        .bind(if source.enabled { 1i64 } else { 0 })
        .bind(source.format.as_str())
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_write_error(e, &source.url))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("Blocklist {} not found", id)));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Blocklist {} not found", id)))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM blocklists WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to delete blocklist");
                DomainError::DatabaseError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("Blocklist {} not found", id)));
        }

        Ok(())
    }

    #[instrument(skip(self, domains), fields(count = domains.len()))]
    async fn replace_domains(&self, source_id: i64, domains: &[String]) -> Result<(), DomainError> {
        let db_err = |e: sqlx::Error| {
            error!(error = %e, source_id, "Failed to replace blocklist domains");
            DomainError::DatabaseError(e.to_string())
        };

        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query("DELETE FROM blocklist_domains WHERE blocklist_id = ?")
            .bind(source_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        for chunk in domains.chunks(INSERT_CHUNK) {
            let mut sql =
                String::from("INSERT OR IGNORE INTO blocklist_domains (blocklist_id, domain) VALUES ");
            for i in 0..chunk.len() {
                if i > 0 {
                    sql.push_str(", ");
                }
                sql.push_str("(?, ?)");
            }

            let mut query = sqlx::query(&sql);
            for domain in chunk {
                query = query.bind(source_id).bind(domain);
            }
            query.execute(&mut *tx).await.map_err(db_err)?;
        }

        tx.commit().await.map_err(db_err)?;

        debug!(source_id, count = domains.len(), "Blocklist domains replaced");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn record_refresh(&self, refresh: &BlocklistRefresh) -> Result<(), DomainError> {
        let now = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

        let query = match &refresh.error {
            None => sqlx::query(
                "UPDATE blocklists SET domain_count = ?, last_refreshed = ?, last_error = NULL
                 WHERE id = ?",
            )
            .bind(refresh.domain_count as i64)
            .bind(&now)
            .bind(refresh.source_id),
            Some(message) => sqlx::query(
                "UPDATE blocklists SET domain_count = ?, last_error = ? WHERE id = ?",
            )
            .bind(refresh.domain_count as i64)
            .bind(message)
            .bind(refresh.source_id),
        };

        query.execute(&self.pool).await.map_err(|e| {
            error!(error = %e, "Failed to record blocklist refresh");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn enabled_domains(&self) -> Result<Vec<String>, DomainError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT d.domain FROM blocklist_domains d
             JOIN blocklists b ON b.id = d.blocklist_id
             WHERE b.enabled = 1",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to load blocklist domains");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(|(domain,)| domain).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> Result<u64, DomainError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM blocklists")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to count blocklists");
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(count.0.max(0) as u64)
    }
}
