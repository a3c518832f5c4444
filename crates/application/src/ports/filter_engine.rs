use async_trait::async_trait;
pub use bastion_dns_domain::BlockReason;
use bastion_dns_domain::{DomainError, RecordType, RewriteType};
use serde::Serialize;
use std::net::IpAddr;
use std::sync::Arc;

/// What the resolver does with a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterAction {
    Forward,
    Block,
    Rewrite,
}

/// Locally synthesized answer of a matched rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteAnswer {
    pub record_type: RewriteType,
    pub answer: Arc<str>,
}

/// The outcome of evaluating one query against the current rule snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterDecision {
    Forward,
    Block(BlockReason),
    Rewrite(RewriteAnswer),
}

impl FilterDecision {
    pub fn action(&self) -> FilterAction {
        match self {
            FilterDecision::Forward => FilterAction::Forward,
            FilterDecision::Block(_) => FilterAction::Block,
            FilterDecision::Rewrite(_) => FilterAction::Rewrite,
        }
    }

    pub fn answer(&self) -> Option<&str> {
        match self {
            FilterDecision::Rewrite(rewrite) => Some(&rewrite.answer),
            _ => None,
        }
    }
}

/// Sizes and version of the snapshot currently published.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SnapshotInfo {
    pub version: u64,
    pub blocked_domains: usize,
    pub allowed_domains: usize,
    pub rewrites: usize,
    pub banned_clients: usize,
    pub clients_with_rules: usize,
    pub compiled_at: Option<String>,
}

/// Application-layer port for the Filter Engine.
///
/// Read methods are synchronous and lock-free: they evaluate against the
/// snapshot published at the instant of the call. Only `reload` and
/// `invalidate_client` touch the rule store.
#[async_trait]
pub trait FilterEnginePort: Send + Sync {
    /// Evaluate a query. Precedence, highest first:
    ///   1. banned client             → block
    ///   2. client allow / block rule → forward / block
    ///   3. enabled rewrite           → rewrite
    ///   4. global block set          → block
    ///   5. otherwise                 → forward
    fn decide(&self, client_ip: IpAddr, domain: &str, query_type: RecordType) -> FilterDecision;

    /// Whether `domain` or one of its ancestors is in the global block set.
    fn is_globally_blocked(&self, domain: &str) -> bool;

    /// Whether a block rule of `client_ip` covers `domain`.
    fn is_client_blocked(&self, client_ip: IpAddr, domain: &str) -> bool;

    fn is_client_banned(&self, client_ip: IpAddr) -> bool;

    /// Recompile the whole snapshot from the rule store and publish it.
    ///
    /// On error the previous snapshot stays current.
    async fn reload(&self) -> Result<(), DomainError>;

    /// Re-derive only `client_ip`'s ban flag and domain rules and publish a
    /// snapshot sharing every other part of the current one.
    async fn invalidate_client(&self, client_ip: IpAddr) -> Result<(), DomainError>;

    fn snapshot_info(&self) -> SnapshotInfo;

    /// Toggle blocklist/filter enforcement. Bans and rewrites still apply.
    fn set_blocking_enabled(&self, enabled: bool);
}
