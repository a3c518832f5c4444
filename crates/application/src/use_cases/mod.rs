pub mod blocklists;
pub mod client_rules;
pub mod clients;
pub mod config;
pub mod filters;
pub mod queries;
pub mod rewrites;
pub mod rules;

pub use blocklists::{
    CreateBlocklistUseCase, DeleteBlocklistUseCase, GetBlocklistsUseCase,
    RefreshBlocklistsUseCase, RefreshSummary, SeedDefaultBlocklistsUseCase,
    UpdateBlocklistUseCase,
};
pub use client_rules::{CreateClientRuleUseCase, DeleteClientRuleUseCase, GetClientRulesUseCase};
pub use clients::{BanClientUseCase, GetClientsUseCase, UnbanClientUseCase};
pub use config::{GetConfigUseCase, UpdateConfigUseCase};
pub use filters::{CreateFilterUseCase, DeleteFilterUseCase, GetFiltersUseCase};
pub use queries::{
    CleanupOldQueryLogsUseCase, GetQueryHistoryUseCase, GetQueryLogUseCase,
    GetRealtimeStatsUseCase,
};
pub use rewrites::{
    CreateRewriteUseCase, DeleteRewriteUseCase, GetRewritesUseCase, RewriteChanges,
    UpdateRewriteUseCase,
};
pub use rules::{CheckDomainStatusUseCase, CustomRulesView, DomainStatus, GetCustomRulesUseCase};
