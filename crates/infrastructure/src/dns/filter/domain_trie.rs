use compact_str::CompactString;
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;
use std::collections::HashMap;

struct TrieNode<V> {
    children: HashMap<CompactString, TrieNode<V>, FxBuildHasher>,
    /// Value of the `*.` pattern ending at this node.
    wildcard: Option<V>,
}

impl<V> TrieNode<V> {
    fn new() -> Self {
        Self {
            children: HashMap::with_hasher(FxBuildHasher),
            wildcard: None,
        }
    }
}

/// Reversed-label trie of `*.domain` patterns.
///
/// `*.lan.example.com` is stored along the path `com → example → lan`. A
/// pattern covers every name with at least one label below its node, so
/// `host.lan.example.com` matches and `lan.example.com` itself does not.
pub struct WildcardTrie<V> {
    root: TrieNode<V>,
    len: usize,
}

impl<V> Default for WildcardTrie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> WildcardTrie<V> {
    pub fn new() -> Self {
        Self {
            root: TrieNode::new(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the value stored for `pattern`, inserting `default()` first if
    /// the pattern is new. The leading `*.` is optional.
    pub fn entry_or_insert_with(&mut self, pattern: &str, default: impl FnOnce() -> V) -> &mut V {
        let domain = pattern.strip_prefix("*.").unwrap_or(pattern);
        let mut node = &mut self.root;
        for label in domain.split('.').rev() {
            node = node
                .children
                .entry(CompactString::new(label))
                .or_insert_with(TrieNode::new);
        }
        if node.wildcard.is_none() {
            self.len += 1;
        }
        node.wildcard.get_or_insert_with(default)
    }

    /// Values of every pattern covering `domain`, most specific first.
    pub fn matches(&self, domain: &str) -> SmallVec<[&V; 4]> {
        let labels: SmallVec<[&str; 8]> = domain.split('.').rev().collect();
        let n = labels.len();
        let mut node = &self.root;
        let mut found: SmallVec<[&V; 4]> = SmallVec::new();

        for (i, label) in labels.iter().enumerate() {
            match node.children.get(*label) {
                Some(child) => {
                    if i + 1 < n {
                        if let Some(value) = &child.wildcard {
                            found.push(value);
                        }
                    }
                    node = child;
                }
                None => break,
            }
        }

        found.reverse();
        found
    }
}
