use async_trait::async_trait;
use bastion_dns_application::ports::ClientRuleRepository;
use bastion_dns_domain::{ClientDomainRule, DomainError, RuleKind};
use sqlx::SqlitePool;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{error, instrument, warn};

type ClientRuleRow = (i64, String, String, String, Option<String>, String);

const SELECT_COLUMNS: &str =
    "SELECT id, client_ip, domain, kind, comment, created_at FROM client_rules";

pub struct SqliteClientRuleRepository {
    pool: SqlitePool,
}

impl SqliteClientRuleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_rule(row: ClientRuleRow) -> Option<ClientDomainRule> {
        let (id, client_ip, domain, kind, comment, created_at) = row;

        let (Ok(client_ip), Ok(kind)) = (client_ip.parse::<IpAddr>(), kind.parse::<RuleKind>())
        else {
            warn!(id, "Skipping malformed client rule");
            return None;
        };

        Some(ClientDomainRule {
            id: Some(id),
            client_ip: client_ip.to_canonical(),
            domain: Arc::from(domain.as_str()),
            kind,
            comment: comment.map(|c| Arc::from(c.as_str())),
            created_at: Some(created_at),
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<ClientDomainRule>, DomainError> {
        let row = sqlx::query_as::<_, ClientRuleRow>(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to query client rule");
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(row.and_then(Self::row_to_rule))
    }
}

#[async_trait]
impl ClientRuleRepository for SqliteClientRuleRepository {
    #[instrument(skip(self, rule), fields(client_ip = %rule.client_ip, domain = %rule.domain))]
    async fn create(&self, rule: ClientDomainRule) -> Result<ClientDomainRule, DomainError> {
        let now = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

        let result = sqlx::query(
            "INSERT INTO client_rules (client_ip, domain, kind, comment, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(rule.client_ip.to_canonical().to_string())
        .bind(rule.domain.as_ref())
        .bind(rule.kind.as_str())
        .bind(rule.comment.as_deref())
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.to_string().contains("UNIQUE constraint failed") {
                DomainError::Conflict(format!(
                    "Client {} already has a {} rule for '{}'",
                    rule.client_ip, rule.kind, rule.domain
                ))
            } else {
                error!(error = %e, "Failed to create client rule");
                DomainError::DatabaseError(e.to_string())
            }
        })?;

        self.get_by_id(result.last_insert_rowid())
            .await?
            .ok_or_else(|| DomainError::DatabaseError("Failed to fetch created rule".to_string()))
    }

    #[instrument(skip(self))]
    async fn get_all(&self) -> Result<Vec<ClientDomainRule>, DomainError> {
        let rows = sqlx::query_as::<_, ClientRuleRow>(&format!("{} ORDER BY id", SELECT_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to query client rules");
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(rows.into_iter().filter_map(Self::row_to_rule).collect())
    }

    #[instrument(skip(self))]
    async fn get_for_client(
        &self,
        client_ip: IpAddr,
    ) -> Result<Vec<ClientDomainRule>, DomainError> {
        let rows = sqlx::query_as::<_, ClientRuleRow>(&format!(
            "{} WHERE client_ip = ? ORDER BY id",
            SELECT_COLUMNS
        ))
        .bind(client_ip.to_canonical().to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to query rules for client");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().filter_map(Self::row_to_rule).collect())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> Result<ClientDomainRule, DomainError> {
        let rule = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Client rule {} not found", id)))?;

        sqlx::query("DELETE FROM client_rules WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to delete client rule");
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(rule)
    }

    #[instrument(skip(self))]
    async fn delete_by_details(
        &self,
        client_ip: IpAddr,
        domain: &str,
        kind: RuleKind,
    ) -> Result<u64, DomainError> {
        let result =
            sqlx::query("DELETE FROM client_rules WHERE client_ip = ? AND domain = ? AND kind = ?")
                .bind(client_ip.to_canonical().to_string())
                .bind(domain)
                .bind(kind.as_str())
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    error!(error = %e, "Failed to delete client rule by details");
                    DomainError::DatabaseError(e.to_string())
                })?;

        Ok(result.rows_affected())
    }
}
