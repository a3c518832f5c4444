//! Configuration module for Bastion DNS
//!
//! - `root`: Main configuration and CLI overrides
//! - `server`: Listener ports and binding
//! - `dns`: Upstream forwarding and answer synthesis
//! - `blocking`: Filtering switches and blocklist refresh
//! - `database`: Rule store and query log settings
//! - `logging`: Logging settings
//! - `errors`: Configuration errors

pub mod blocking;
pub mod database;
pub mod dns;
pub mod errors;
pub mod logging;
pub mod root;
pub mod server;

pub use blocking::BlockingConfig;
pub use database::DatabaseConfig;
pub use dns::{BlockingMode, DnsConfig};
pub use errors::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
