pub mod blocklist;
pub mod client;
pub mod config;
pub mod filter;
pub mod query;
pub mod rewrite;
pub mod rules;
pub mod server;

pub use blocklist::{
    BlocklistResponse, CreateBlocklistRequest, RefreshResponse, UpdateBlocklistRequest,
};
pub use client::{BanClientRequest, ClientResponse, ClientSettingsResponse};
pub use config::{DnsConfigResponse, UpdateDnsConfigRequest};
pub use filter::{
    CreateFilterRequest, DeleteFilterRequest, DeletedCountResponse, FilterQuery, FilterResponse,
};
pub use query::{
    HistoryQuery, HistoryResponse, LogsQuery, QueryLogEntryResponse, QueryLogPageResponse,
    StatsResponse,
};
pub use rewrite::{CreateRewriteRequest, RewriteResponse, UpdateRewriteRequest};
pub use rules::{
    CheckDomainQuery, ClientRuleQuery, ClientRuleResponse, CreateClientRuleRequest,
    CustomRulesResponse, DeleteClientRuleRequest, DomainStatusResponse,
};
pub use server::{ReloadResponse, ServerStatusResponse};
