pub mod cleanup;
pub mod get_history;
pub mod get_logs;
pub mod get_stats;

pub use cleanup::CleanupOldQueryLogsUseCase;
pub use get_history::GetQueryHistoryUseCase;
pub use get_logs::GetQueryLogUseCase;
pub use get_stats::GetRealtimeStatsUseCase;
