//! Domain name normalization and rule matching.
//!
//! Every rule domain is normalized before it is persisted or compiled, and every
//! query name is normalized before it is evaluated, so comparisons below only
//! ever see the canonical form.

use std::borrow::Cow;

/// Canonical form of a domain: trimmed, lowercase, one trailing `.` removed.
pub fn normalize_domain(domain: &str) -> String {
    normalize_domain_cow(domain).into_owned()
}

/// [`normalize_domain`] that borrows when the input is already lowercase.
pub fn normalize_domain_cow(domain: &str) -> Cow<'_, str> {
    let trimmed = domain.trim();
    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
    if trimmed.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(trimmed.to_ascii_lowercase())
    } else {
        Cow::Borrowed(trimmed)
    }
}

/// Returns true when `rule` equals `query` or is a dot-separated suffix of it.
///
/// `ads.example.com` matches `ads.example.com` and `x.ads.example.com`, but not
/// `badsexample.com` nor `example.com`. There is no wildcard syntax.
pub fn matches(rule: &str, query: &str) -> bool {
    let rule = normalize_domain(rule);
    let query = normalize_domain(query);
    matches_normalized(&rule, &query)
}

/// [`matches`] for inputs that are already normalized (hot path).
#[inline]
pub fn matches_normalized(rule: &str, query: &str) -> bool {
    if rule.is_empty() {
        return false;
    }
    if query.len() == rule.len() {
        return query == rule;
    }
    query.len() > rule.len()
        && query.ends_with(rule)
        && query.as_bytes()[query.len() - rule.len() - 1] == b'.'
}

/// Iterates `domain` and each of its parent domains, most specific first.
///
/// `a.b.c` yields `a.b.c`, `b.c`, `c`.
pub fn self_and_ancestors(domain: &str) -> impl Iterator<Item = &str> {
    let mut next = if domain.is_empty() { None } else { Some(domain) };
    std::iter::from_fn(move || {
        let current = next?;
        next = current.find('.').map(|idx| &current[idx + 1..]);
        Some(current)
    })
}

/// Checks label syntax of a normalized domain.
///
/// Accepts letters, digits, `-` and `_` in labels of 1..=63 characters, total
/// length up to 253. A leading `*.` is accepted when `allow_wildcard` is set.
pub fn is_valid_domain(domain: &str, allow_wildcard: bool) -> bool {
    let domain = if allow_wildcard {
        domain.strip_prefix("*.").unwrap_or(domain)
    } else {
        domain
    };

    if domain.is_empty() || domain.len() > 253 {
        return false;
    }

    domain.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    })
}
