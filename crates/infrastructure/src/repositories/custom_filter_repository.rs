use async_trait::async_trait;
use bastion_dns_application::ports::CustomFilterRepository;
use bastion_dns_domain::{CustomFilter, DomainError, FilterKind};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{error, instrument};

type CustomFilterRow = (i64, String, String, Option<String>, String);

pub struct SqliteCustomFilterRepository {
    pool: SqlitePool,
}

impl SqliteCustomFilterRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_filter(row: CustomFilterRow) -> Option<CustomFilter> {
        let (id, domain, kind, comment, created_at) = row;

        Some(CustomFilter {
            id: Some(id),
            domain: Arc::from(domain.as_str()),
            kind: kind.parse().ok()?,
            comment: comment.map(|c| Arc::from(c.as_str())),
            created_at: Some(created_at),
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<CustomFilter>, DomainError> {
        let row = sqlx::query_as::<_, CustomFilterRow>(
            "SELECT id, domain, kind, comment, created_at FROM custom_filters WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to query custom filter");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.and_then(Self::row_to_filter))
    }
}

#[async_trait]
impl CustomFilterRepository for SqliteCustomFilterRepository {
    #[instrument(skip(self, filter), fields(domain = %filter.domain, kind = %filter.kind))]
    async fn create(&self, filter: CustomFilter) -> Result<CustomFilter, DomainError> {
        let now = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

        let result = sqlx::query(
            "INSERT INTO custom_filters (domain, kind, comment, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(filter.domain.as_ref())
        .bind(filter.kind.as_str())
        .bind(filter.comment.as_deref())
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.to_string().contains("UNIQUE constraint failed") {
                DomainError::Conflict(format!(
                    "Domain '{}' is already in the {}",
                    filter.domain, filter.kind
                ))
            } else {
                error!(error = %e, "Failed to create custom filter");
                DomainError::DatabaseError(e.to_string())
            }
        })?;

        self.get_by_id(result.last_insert_rowid())
            .await?
            .ok_or_else(|| DomainError::DatabaseError("Failed to fetch created filter".to_string()))
    }

    #[instrument(skip(self))]
    async fn get_all(&self) -> Result<Vec<CustomFilter>, DomainError> {
        let rows = sqlx::query_as::<_, CustomFilterRow>(
            "SELECT id, domain, kind, comment, created_at FROM custom_filters ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to query custom filters");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().filter_map(Self::row_to_filter).collect())
    }

    #[instrument(skip(self))]
    async fn get_by_kind(&self, kind: FilterKind) -> Result<Vec<CustomFilter>, DomainError> {
        let rows = sqlx::query_as::<_, CustomFilterRow>(
            "SELECT id, domain, kind, comment, created_at FROM custom_filters
             WHERE kind = ? ORDER BY id",
        )
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to query custom filters by kind");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().filter_map(Self::row_to_filter).collect())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM custom_filters WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to delete custom filter");
                DomainError::DatabaseError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("Filter {} not found", id)));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_by_domain(&self, domain: &str, kind: FilterKind) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM custom_filters WHERE domain = ? AND kind = ?")
            .bind(domain)
            .bind(kind.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to delete custom filter by domain");
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(result.rows_affected())
    }
}
