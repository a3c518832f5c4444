use async_trait::async_trait;
use bastion_dns_application::ports::RewriteRepository;
use bastion_dns_domain::{DomainError, Rewrite};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{error, instrument, warn};

type RewriteRow = (
    i64,
    String,
    String,
    String,
    i64,
    Option<String>,
    String,
    String,
);

const SELECT_COLUMNS: &str = "SELECT id, domain, record_type, answer, enabled, comment, created_at, updated_at FROM rewrites";

pub struct SqliteRewriteRepository {
    pool: SqlitePool,
}

impl SqliteRewriteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_rewrite(row: RewriteRow) -> Option<Rewrite> {
        let (id, domain, record_type, answer, enabled, comment, created_at, updated_at) = row;

        let record_type = match record_type.parse() {
            Ok(t) => t,
            Err(e) => {
                warn!(id, error = %e, "Skipping rewrite with unknown record type");
                return None;
            }
        };

        Some(Rewrite {
            id: Some(id),
            domain: Arc::from(domain.as_str()),
            record_type,
            answer: Arc::from(answer.as_str()),
            enabled: enabled != 0,
            comment: comment.map(|c| Arc::from(c.as_str())),
            created_at: Some(created_at),
            updated_at: Some(updated_at),
        })
    }

    fn map_write_error(e: sqlx::Error, rewrite: &Rewrite) -> DomainError {
        if e.to_string().contains("UNIQUE constraint failed") {
            DomainError::Conflict(format!(
                "Rewrite {} {} -> {} already exists",
                rewrite.domain, rewrite.record_type, rewrite.answer
            ))
        } else {
            error!(error = %e, "Failed to write rewrite");
            DomainError::DatabaseError(e.to_string())
        }
    }

    async fn fetch(&self, sql: &str) -> Result<Vec<Rewrite>, DomainError> {
        let rows = sqlx::query_as::<_, RewriteRow>(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to query rewrites");
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(rows.into_iter().filter_map(Self::row_to_rewrite).collect())
    }
}

#[async_trait]
impl RewriteRepository for SqliteRewriteRepository {
    #[instrument(skip(self, rewrite), fields(domain = %rewrite.domain))]
    async fn create(&self, rewrite: Rewrite) -> Result<Rewrite, DomainError> {
        let now = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

        let result = sqlx::query(
            "INSERT INTO rewrites (domain, record_type, answer, enabled, comment, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(rewrite.domain.as_ref())
        .bind(rewrite.record_type.as_str())
        .bind(rewrite.answer.as_ref())
        .bind(if rewrite.enabled { 1i64 } else { 0 })
        .bind(rewrite.comment.as_deref())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_write_error(e, &rewrite))?;

        self.get_by_id(result.last_insert_rowid())
            .await?
            .ok_or_else(|| DomainError::DatabaseError("Failed to fetch created rewrite".to_string()))
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: i64) -> Result<Option<Rewrite>, DomainError> {
        let row = sqlx::query_as::<_, RewriteRow>(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to query rewrite by id");
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(row.and_then(Self::row_to_rewrite))
    }

    #[instrument(skip(self))]
    async fn get_all(&self) -> Result<Vec<Rewrite>, DomainError> {
        self.fetch(&format!("{} ORDER BY id", SELECT_COLUMNS)).await
    }

    #[instrument(skip(self))]
    async fn get_enabled(&self) -> Result<Vec<Rewrite>, DomainError> {
        self.fetch(&format!("{} WHERE enabled = 1 ORDER BY id", SELECT_COLUMNS))
            .await
    }

    #[instrument(skip(self, rewrite), fields(id = ?rewrite.id))]
    async fn update(&self, rewrite: Rewrite) -> Result<Rewrite, DomainError> {
        let id = rewrite
            .id
            .ok_or_else(|| DomainError::InvalidInput("Rewrite id is required".to_string()))?;
        let now = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

        let result = sqlx::query(
            "UPDATE rewrites SET domain = ?, record_type = ?, answer = ?, enabled = ?, comment = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(rewrite.domain.as_ref())
        .bind(rewrite.record_type.as_str())
        .bind(rewrite.answer.as_ref())
        .bind(if rewrite.enabled { 1i64 } else { 0 })
        .bind(rewrite.comment.as_deref())
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_write_error(e, &rewrite))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("Rewrite {} not found", id)));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Rewrite {} not found", id)))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM rewrites WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to delete rewrite");
                DomainError::DatabaseError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("Rewrite {} not found", id)));
        }

        Ok(())
    }
}
