pub mod blocklists;
pub mod client_rules;
pub mod clients;
pub mod config;
pub mod filters;
pub mod health;
pub mod queries;
pub mod rewrites;
pub mod rules;
pub mod server;

pub use health::health_check;
