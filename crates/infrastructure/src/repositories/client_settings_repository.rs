use async_trait::async_trait;
use bastion_dns_application::ports::ClientSettingsRepository;
use bastion_dns_domain::{ClientSettings, DomainError};
use sqlx::SqlitePool;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

type ClientSettingsRow = (
    String,
    Option<String>,
    i64,
    Option<String>,
    Option<String>,
    String,
);

const SELECT_COLUMNS: &str =
    "SELECT client_ip, client_name, blocked, block_reason, blocked_at, updated_at FROM client_settings";

pub struct SqliteClientSettingsRepository {
    pool: SqlitePool,
}

impl SqliteClientSettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_settings(row: ClientSettingsRow) -> Option<ClientSettings> {
        let (client_ip, client_name, blocked, block_reason, blocked_at, updated_at) = row;

        let client_ip = match client_ip.parse::<IpAddr>() {
            Ok(ip) => ip.to_canonical(),
            Err(e) => {
                warn!(client_ip = %client_ip, error = %e, "Skipping client settings with invalid IP");
                return None;
            }
        };

        Some(ClientSettings {
            client_ip,
            client_name: client_name.map(|n| Arc::from(n.as_str())),
            blocked: blocked != 0,
            block_reason: block_reason.map(|r| Arc::from(r.as_str())),
            blocked_at,
            updated_at: Some(updated_at),
        })
    }

    async fn require(&self, client_ip: IpAddr) -> Result<ClientSettings, DomainError> {
        self.get(client_ip)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Client {} not found", client_ip)))
    }
}

#[async_trait]
impl ClientSettingsRepository for SqliteClientSettingsRepository {
    #[instrument(skip(self))]
    async fn get(&self, client_ip: IpAddr) -> Result<Option<ClientSettings>, DomainError> {
        let row = sqlx::query_as::<_, ClientSettingsRow>(&format!(
            "{} WHERE client_ip = ?",
            SELECT_COLUMNS
        ))
        .bind(client_ip.to_canonical().to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to query client settings");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.and_then(Self::row_to_settings))
    }

    #[instrument(skip(self))]
    async fn get_banned(&self) -> Result<Vec<ClientSettings>, DomainError> {
        let rows = sqlx::query_as::<_, ClientSettingsRow>(&format!(
            "{} WHERE blocked = 1 ORDER BY blocked_at DESC",
            SELECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to query banned clients");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().filter_map(Self::row_to_settings).collect())
    }

    #[instrument(skip(self))]
    async fn ban(
        &self,
        client_ip: IpAddr,
        reason: Option<String>,
        client_name: Option<String>,
    ) -> Result<ClientSettings, DomainError> {
        let now = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

        sqlx::query(
            "INSERT INTO client_settings (client_ip, client_name, blocked, block_reason, blocked_at, updated_at)
             VALUES (?, ?, 1, ?, ?, ?)
             ON CONFLICT(client_ip) DO UPDATE SET
                blocked = 1,
                block_reason = excluded.block_reason,
                blocked_at = excluded.blocked_at,
                client_name = COALESCE(excluded.client_name, client_settings.client_name),
                updated_at = excluded.updated_at",
        )
        .bind(client_ip.to_canonical().to_string())
        .bind(client_name.as_deref())
        .bind(reason.as_deref())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to ban client");
            DomainError::DatabaseError(e.to_string())
        })?;

        info!(client_ip = %client_ip, "Client banned");
        self.require(client_ip).await
    }

    #[instrument(skip(self))]
    async fn unban(&self, client_ip: IpAddr) -> Result<ClientSettings, DomainError> {
        let now = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

        let result = sqlx::query(
            "UPDATE client_settings SET blocked = 0, block_reason = NULL, blocked_at = NULL, updated_at = ?
             WHERE client_ip = ?",
        )
        .bind(&now)
        .bind(client_ip.to_canonical().to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to unban client");
            DomainError::DatabaseError(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("Client {} not found", client_ip)));
        }

        info!(client_ip = %client_ip, "Client unbanned");
        self.require(client_ip).await
    }
}
