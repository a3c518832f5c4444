pub mod blocklist_repository;
pub mod client_rule_repository;
pub mod client_settings_repository;
pub mod config_repository;
pub mod custom_filter_repository;
pub mod query_log_repository;
pub mod rewrite_repository;

pub use blocklist_repository::SqliteBlocklistRepository;
pub use client_rule_repository::SqliteClientRuleRepository;
pub use client_settings_repository::SqliteClientSettingsRepository;
pub use config_repository::FileConfigRepository;
pub use custom_filter_repository::SqliteCustomFilterRepository;
pub use query_log_repository::SqliteQueryLogRepository;
pub use rewrite_repository::SqliteRewriteRepository;
