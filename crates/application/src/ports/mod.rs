pub mod blocklist_fetcher;
pub mod blocklist_repository;
pub mod client_rule_repository;
pub mod client_settings_repository;
pub mod config_repository;
pub mod custom_filter_repository;
pub mod dns_server_control;
pub mod filter_engine;
pub mod live_stats;
pub mod query_log_repository;
pub mod rewrite_repository;

pub use blocklist_fetcher::BlocklistFetcher;
pub use blocklist_repository::BlocklistRepository;
pub use client_rule_repository::ClientRuleRepository;
pub use client_settings_repository::ClientSettingsRepository;
pub use config_repository::{ConfigObserver, ConfigRepository};
pub use custom_filter_repository::CustomFilterRepository;
pub use dns_server_control::{DnsServerControl, DnsServerStatus, UpstreamHealth};
pub use filter_engine::{
    BlockReason, FilterAction, FilterDecision, FilterEnginePort, RewriteAnswer, SnapshotInfo,
};
pub use live_stats::LiveStatsPort;
pub use query_log_repository::QueryLogRepository;
pub use rewrite_repository::RewriteRepository;
