use async_trait::async_trait;
use bastion_dns_application::ports::ConfigRepository;
use bastion_dns_domain::{Config, DomainError};
use std::path::PathBuf;
use tokio::sync::RwLock;
use toml_edit::{DocumentMut, Item};
use tracing::{info, instrument, warn};

/// Configuration held in memory and written back to the TOML file it was
/// loaded from.
///
/// Saving merges the new values into the existing document with `toml_edit`
/// so the administrator's comments and key order survive.
pub struct FileConfigRepository {
    path: Option<PathBuf>,
    current: RwLock<Config>,
}

impl FileConfigRepository {
    pub fn new(config: Config, path: Option<PathBuf>) -> Self {
        Self {
            path,
            current: RwLock::new(config),
        }
    }

    /// Repository that never touches the filesystem.
    pub fn in_memory(config: Config) -> Self {
        Self::new(config, None)
    }

    fn render(existing: &str, config: &Config) -> Result<String, DomainError> {
        let fresh = toml::to_string(config)
            .map_err(|e| DomainError::ConfigError(format!("Failed to serialize config: {}", e)))?;
        let fresh: DocumentMut = fresh
            .parse()
            .map_err(|e| DomainError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        let mut doc: DocumentMut = match existing.parse() {
            Ok(doc) => doc,
            Err(e) => {
                warn!(error = %e, "Existing config file is not valid TOML, rewriting it");
                return Ok(fresh.to_string());
            }
        };

        for (section, item) in fresh.iter() {
            match (item, doc.get_mut(section)) {
                (Item::Table(new_table), Some(Item::Table(old_table))) => {
                    for (key, value) in new_table.iter() {
                        old_table.insert(key, value.clone());
                    }
                }
                _ => {
                    doc.insert(section, item.clone());
                }
            }
        }

        Ok(doc.to_string())
    }
}

#[async_trait]
impl ConfigRepository for FileConfigRepository {
    async fn get_config(&self) -> Result<Config, DomainError> {
        Ok(self.current.read().await.clone())
    }

    #[instrument(skip(self, config))]
    async fn save_config(&self, config: &Config) -> Result<(), DomainError> {
        let mut current = self.current.write().await;

        if let Some(path) = &self.path {
            let existing = match tokio::fs::read_to_string(path).await {
                Ok(text) => text,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
                Err(e) => return Err(DomainError::IoError(e.to_string())),
            };

            let rendered = Self::render(&existing, config)?;
            tokio::fs::write(path, rendered)
                .await
                .map_err(|e| DomainError::IoError(e.to_string()))?;

            info!(path = %path.display(), "Configuration saved");
        }

        *current = config.clone();
        Ok(())
    }
}
