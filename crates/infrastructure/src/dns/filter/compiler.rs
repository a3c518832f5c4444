use super::snapshot::{ClientRuleSet, DomainSet, FilterSnapshot, GlobalRules, RewriteIndex};
use bastion_dns_application::ports::{
    BlocklistRepository, ClientRuleRepository, ClientSettingsRepository, CustomFilterRepository,
    RewriteRepository,
};
use bastion_dns_domain::{
    ClientDomainRule, ClientSettings, CustomFilter, DomainError, FilterKind, Rewrite, RuleKind,
};
use rustc_hash::FxBuildHasher;
use std::collections::{HashMap, HashSet};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, error};

/// Raw rule rows read from the store for one compilation.
#[derive(Default)]
pub struct RuleSet {
    pub blocklist_domains: Vec<String>,
    pub filters: Vec<CustomFilter>,
    pub rewrites: Vec<Rewrite>,
    pub banned: Vec<ClientSettings>,
    pub client_rules: Vec<ClientDomainRule>,
}

/// Reads every rule table through the repository ports.
///
/// Any store error is reported as `StoreUnavailable`; the caller keeps its
/// previous snapshot.
pub struct RuleCompiler {
    blocklists: Arc<dyn BlocklistRepository>,
    filters: Arc<dyn CustomFilterRepository>,
    rewrites: Arc<dyn RewriteRepository>,
    client_settings: Arc<dyn ClientSettingsRepository>,
    client_rules: Arc<dyn ClientRuleRepository>,
}

impl RuleCompiler {
    pub fn new(
        blocklists: Arc<dyn BlocklistRepository>,
        filters: Arc<dyn CustomFilterRepository>,
        rewrites: Arc<dyn RewriteRepository>,
        client_settings: Arc<dyn ClientSettingsRepository>,
        client_rules: Arc<dyn ClientRuleRepository>,
    ) -> Self {
        Self {
            blocklists,
            filters,
            rewrites,
            client_settings,
            client_rules,
        }
    }

    pub async fn load_rules(&self) -> Result<RuleSet, DomainError> {
        let (blocklist_domains, filters, rewrites, banned, client_rules) = tokio::try_join!(
            self.blocklists.enabled_domains(),
            self.filters.get_all(),
            self.rewrites.get_enabled(),
            self.client_settings.get_banned(),
            self.client_rules.get_all(),
        )
        .map_err(store_unavailable)?;

        debug!(
            blocklist_domains = blocklist_domains.len(),
            filters = filters.len(),
            rewrites = rewrites.len(),
            banned = banned.len(),
            client_rules = client_rules.len(),
            "Rules loaded"
        );

        Ok(RuleSet {
            blocklist_domains,
            filters,
            rewrites,
            banned,
            client_rules,
        })
    }

    /// Ban flag and domain rules of one client.
    pub async fn load_client(
        &self,
        client_ip: IpAddr,
    ) -> Result<(bool, Vec<ClientDomainRule>), DomainError> {
        let (settings, rules) = tokio::try_join!(
            self.client_settings.get(client_ip),
            self.client_rules.get_for_client(client_ip),
        )
        .map_err(store_unavailable)?;

        Ok((settings.is_some_and(|s| s.blocked), rules))
    }
}

fn store_unavailable(e: DomainError) -> DomainError {
    error!(error = %e, "Rule store unavailable");
    match e {
        DomainError::StoreUnavailable(_) => e,
        other => DomainError::StoreUnavailable(other.to_string()),
    }
}

/// Build a snapshot from raw rule rows.
///
/// Block set: blocklist domains plus blacklist filters, minus every entry a
/// whitelist filter covers. The allow set is kept so whitelisted
/// subdomains of a blocked parent stay resolvable.
pub fn build_snapshot(rules: RuleSet, version: u64, compiled_at: Option<String>) -> FilterSnapshot {
    let mut blocked = DomainSet::default();
    let mut allowed = DomainSet::default();

    for domain in &rules.blocklist_domains {
        blocked.insert(domain);
    }
    for filter in &rules.filters {
        match filter.kind {
            FilterKind::Blacklist => blocked.insert(&filter.domain),
            FilterKind::Whitelist => allowed.insert(&filter.domain),
        };
    }
    if !allowed.is_empty() {
        blocked.retain(|domain| !allowed.covers(domain));
    }

    let mut rewrites = RewriteIndex::default();
    let mut ordered: Vec<&Rewrite> = rules
        .rewrites
        .iter()
        .filter(|r| r.enabled && !r.is_passthrough())
        .collect();
    ordered.sort_by_key(|r| r.id.unwrap_or(i64::MAX));
    for rewrite in ordered {
        rewrites.insert(&rewrite.domain, rewrite.record_type, rewrite.answer.clone());
    }

    let mut banned = HashSet::with_hasher(FxBuildHasher);
    for settings in rules.banned.iter().filter(|s| s.blocked) {
        banned.insert(settings.client_ip.to_canonical());
    }

    let mut grouped: HashMap<IpAddr, ClientRuleSet, FxBuildHasher> =
        HashMap::with_hasher(FxBuildHasher);
    for rule in &rules.client_rules {
        let set = grouped.entry(rule.client_ip.to_canonical()).or_default();
        add_client_rule(set, rule);
    }
    let clients = grouped
        .into_iter()
        .map(|(ip, set)| (ip, Arc::new(set)))
        .collect();

    FilterSnapshot {
        version,
        compiled_at,
        global: Arc::new(GlobalRules {
            blocked,
            allowed,
            rewrites,
        }),
        banned,
        clients,
    }
}

/// Rule set of a single client, or `None` when it has no rules.
pub fn build_client_rules(rules: &[ClientDomainRule]) -> Option<ClientRuleSet> {
    if rules.is_empty() {
        return None;
    }
    let mut set = ClientRuleSet::default();
    for rule in rules {
        add_client_rule(&mut set, rule);
    }
    Some(set)
}

fn add_client_rule(set: &mut ClientRuleSet, rule: &ClientDomainRule) {
    match rule.kind {
        RuleKind::Block => set.block.insert(&rule.domain),
        RuleKind::Allow => set.allow.insert(&rule.domain),
    };
}
