pub mod cache;
pub mod filter;
pub mod handler;
pub mod metrics;
pub mod server;
pub mod upstream;
pub mod wire;

pub use cache::{spawn_purge_task, AnswerCache, PURGE_INTERVAL};
pub use filter::{FilterEngine, FilterSnapshot, RuleCompiler};
pub use handler::{Protocol, QueryHandler};
pub use metrics::QueryMetrics;
pub use server::{DnsListener, DnsServerController};
pub use upstream::UpstreamForwarder;
