use serde::{Deserialize, Serialize};

/// Rule store and query log configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path to SQLite database file (default: "./bastion-dns.db")
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Persist answered queries (default: true)
    #[serde(default = "default_true")]
    pub query_logging: bool,

    /// Days of query log kept by the retention job (default: 7)
    #[serde(default = "default_retention_days")]
    pub log_retention_days: u32,
}

impl DatabaseConfig {
    pub fn url(&self) -> String {
        if self.path.starts_with("sqlite:") {
            self.path.clone()
        } else {
            format!("sqlite://{}", self.path)
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            query_logging: true,
            log_retention_days: default_retention_days(),
        }
    }
}

fn default_db_path() -> String {
    "./bastion-dns.db".to_string()
}

fn default_true() -> bool {
    true
}

fn default_retention_days() -> u32 {
    7
}
