//! Bastion DNS Domain Layer
pub mod blocklist;
pub mod client;
pub mod config;
pub mod custom_filter;
pub mod domain_name;
pub mod errors;
pub mod query_log;
pub mod record_type;
pub mod rewrite;
pub mod validators;

pub use blocklist::{BlocklistRefresh, BlocklistSource, ListFormat, DEFAULT_BLOCKLISTS};
pub use client::{ClientActivity, ClientDomainRule, ClientSettings, RuleKind};
pub use config::{CliOverrides, Config, ConfigError};
pub use custom_filter::{CustomFilter, FilterKind};
pub use domain_name::{matches, normalize_domain, normalize_domain_cow};
pub use errors::DomainError;
pub use query_log::{
    BlockReason, DomainCount, HourlyBucket, LiveCounters, QueryLogEntry, QueryLogPage,
    QueryLogSummary, QueryStatus, RealtimeStats,
};
pub use record_type::RecordType;
pub use rewrite::{Rewrite, RewriteType};
