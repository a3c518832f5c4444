//! Bastion DNS Infrastructure Layer
pub mod blocklist;
pub mod database;
pub mod dns;
pub mod repositories;
