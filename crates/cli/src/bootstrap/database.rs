use bastion_dns_domain::config::DatabaseConfig;
use bastion_dns_infrastructure::database::create_pool;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::{error, info};

pub async fn init_database(cfg: &DatabaseConfig) -> anyhow::Result<SqlitePool> {
    let database_url = cfg.url();
    info!("Initializing database: {}", database_url);

    if !cfg.path.starts_with("sqlite:") {
        if let Some(parent) = Path::new(&cfg.path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }

    let pool = create_pool(&database_url).await.map_err(|e| {
        error!("Failed to initialize database: {}", e);
        anyhow::anyhow!(e)
    })?;

    info!("Database initialized successfully");
    Ok(pool)
}
