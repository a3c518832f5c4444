pub mod blocklist_refresh;
pub mod query_log_retention;
pub mod runner;

pub use blocklist_refresh::BlocklistRefreshJob;
pub use query_log_retention::{QueryLogRetentionJob, RetentionWindow};
pub use runner::JobRunner;
