use super::domain_trie::WildcardTrie;
use bastion_dns_application::ports::{BlockReason, FilterDecision, RewriteAnswer, SnapshotInfo};
use bastion_dns_domain::domain_name::self_and_ancestors;
use bastion_dns_domain::{RecordType, RewriteType};
use compact_str::CompactString;
use rustc_hash::{FxBuildHasher, FxHashSet};
use std::collections::{HashMap, HashSet};
use std::net::IpAddr;
use std::sync::Arc;

/// Set of normalized domains, each covering itself and its subdomains.
#[derive(Default)]
pub struct DomainSet {
    domains: FxHashSet<CompactString>,
}

impl DomainSet {
    pub fn insert(&mut self, domain: &str) -> bool {
        self.domains.insert(CompactString::new(domain))
    }

    pub fn remove(&mut self, domain: &str) -> bool {
        self.domains.remove(domain)
    }

    pub fn contains_exact(&self, domain: &str) -> bool {
        self.domains.contains(domain)
    }

    /// True when `domain` or one of its ancestors is in the set.
    #[inline]
    pub fn covers(&self, domain: &str) -> bool {
        !self.domains.is_empty() && self_and_ancestors(domain).any(|d| self.domains.contains(d))
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.domains.retain(|d| keep(d.as_str()));
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for DomainSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = DomainSet::default();
        for domain in iter {
            set.insert(domain);
        }
        set
    }
}

/// Answers configured for one rewrite domain. The first enabled row of each
/// type wins.
#[derive(Debug, Default, Clone)]
pub struct RewriteEntry {
    pub a: Option<Arc<str>>,
    pub aaaa: Option<Arc<str>>,
    pub cname: Option<Arc<str>>,
}

impl RewriteEntry {
    pub fn set_if_absent(&mut self, record_type: RewriteType, answer: Arc<str>) {
        let slot = match record_type {
            RewriteType::A => &mut self.a,
            RewriteType::AAAA => &mut self.aaaa,
            RewriteType::CNAME => &mut self.cname,
        };
        if slot.is_none() {
            *slot = Some(answer);
        }
    }

    /// A and AAAA queries fall back to the CNAME answer.
    pub fn answer_for(&self, query_type: RecordType) -> Option<RewriteAnswer> {
        let typed = match query_type {
            RecordType::A => self.a.as_ref().map(|a| (RewriteType::A, a)),
            RecordType::AAAA => self.aaaa.as_ref().map(|a| (RewriteType::AAAA, a)),
            RecordType::CNAME => None,
            RecordType::Other(_) => return None,
        };

        typed
            .or_else(|| self.cname.as_ref().map(|c| (RewriteType::CNAME, c)))
            .map(|(record_type, answer)| RewriteAnswer {
                record_type,
                answer: answer.clone(),
            })
    }
}

/// Exact and `*.` wildcard rewrite tables.
#[derive(Default)]
pub struct RewriteIndex {
    exact: HashMap<CompactString, RewriteEntry, FxBuildHasher>,
    wildcard: WildcardTrie<RewriteEntry>,
}

impl RewriteIndex {
    pub fn insert(&mut self, domain: &str, record_type: RewriteType, answer: Arc<str>) {
        let entry = if domain.starts_with("*.") {
            self.wildcard
                .entry_or_insert_with(domain, RewriteEntry::default)
        } else {
            self.exact.entry(CompactString::new(domain)).or_default()
        };
        entry.set_if_absent(record_type, answer);
    }

    /// Exact entries first, then wildcard patterns from most to least
    /// specific; the first one with an answer for `query_type` wins.
    pub fn lookup(&self, domain: &str, query_type: RecordType) -> Option<RewriteAnswer> {
        if !query_type.is_rewritable() || self.is_empty() {
            return None;
        }
        if let Some(answer) = self
            .exact
            .get(domain)
            .and_then(|entry| entry.answer_for(query_type))
        {
            return Some(answer);
        }
        self.wildcard
            .matches(domain)
            .into_iter()
            .find_map(|entry| entry.answer_for(query_type))
    }

    pub fn len(&self) -> usize {
        self.exact.len() + self.wildcard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.wildcard.is_empty()
    }
}

/// Rules that apply to every client.
#[derive(Default)]
pub struct GlobalRules {
    pub blocked: DomainSet,
    pub allowed: DomainSet,
    pub rewrites: RewriteIndex,
}

impl GlobalRules {
    #[inline]
    pub fn is_blocked(&self, domain: &str) -> bool {
        self.blocked.covers(domain) && !self.allowed.covers(domain)
    }
}

/// Domain rules of one client.
#[derive(Default)]
pub struct ClientRuleSet {
    pub block: DomainSet,
    pub allow: DomainSet,
}

impl ClientRuleSet {
    pub fn is_empty(&self) -> bool {
        self.block.is_empty() && self.allow.is_empty()
    }
}

/// Immutable, versioned view of every rule the engine evaluates.
///
/// Published whole through an `ArcSwap`; client invalidation builds a new
/// snapshot that shares `global` and the untouched client entries.
pub struct FilterSnapshot {
    pub version: u64,
    pub compiled_at: Option<String>,
    pub global: Arc<GlobalRules>,
    pub banned: HashSet<IpAddr, FxBuildHasher>,
    pub clients: HashMap<IpAddr, Arc<ClientRuleSet>, FxBuildHasher>,
}

impl FilterSnapshot {
    /// Snapshot that forwards everything.
    pub fn empty() -> Self {
        Self {
            version: 0,
            compiled_at: None,
            global: Arc::new(GlobalRules::default()),
            banned: HashSet::with_hasher(FxBuildHasher),
            clients: HashMap::with_hasher(FxBuildHasher),
        }
    }

    /// Evaluate a normalized query name for a canonical client address.
    pub fn decide(
        &self,
        client_ip: IpAddr,
        domain: &str,
        query_type: RecordType,
        blocking_enabled: bool,
    ) -> FilterDecision {
        if self.banned.contains(&client_ip) {
            return FilterDecision::Block(BlockReason::ClientBanned);
        }

        if let Some(rules) = self.clients.get(&client_ip) {
            if rules.allow.covers(domain) {
                return FilterDecision::Forward;
            }
            if blocking_enabled && rules.block.covers(domain) {
                return FilterDecision::Block(BlockReason::ClientRule);
            }
        }

        if let Some(answer) = self.global.rewrites.lookup(domain, query_type) {
            return FilterDecision::Rewrite(answer);
        }

        if blocking_enabled && self.global.is_blocked(domain) {
            return FilterDecision::Block(BlockReason::Blocklist);
        }

        FilterDecision::Forward
    }

    pub fn is_client_blocked(&self, client_ip: IpAddr, domain: &str) -> bool {
        self.clients
            .get(&client_ip)
            .is_some_and(|rules| rules.block.covers(domain))
    }

    /// Copy of this snapshot with `client_ip`'s ban flag and rules replaced.
    pub fn with_client(
        &self,
        version: u64,
        client_ip: IpAddr,
        banned: bool,
        rules: Option<ClientRuleSet>,
    ) -> Self {
        let mut banned_set = self.banned.clone();
        if banned {
            banned_set.insert(client_ip);
        } else {
            banned_set.remove(&client_ip);
        }

        let mut clients = self.clients.clone();
        match rules {
            Some(rules) if !rules.is_empty() => {
                clients.insert(client_ip, Arc::new(rules));
            }
            _ => {
                clients.remove(&client_ip);
            }
        }

        Self {
            version,
            compiled_at: self.compiled_at.clone(),
            global: Arc::clone(&self.global),
            banned: banned_set,
            clients,
        }
    }

    pub fn info(&self) -> SnapshotInfo {
        SnapshotInfo {
            version: self.version,
            blocked_domains: self.global.blocked.len(),
            allowed_domains: self.global.allowed.len(),
            rewrites: self.global.rewrites.len(),
            banned_clients: self.banned.len(),
            clients_with_rules: self.clients.len(),
            compiled_at: self.compiled_at.clone(),
        }
    }
}
