use bastion_dns_domain::domain_name::{is_valid_domain, normalize_domain};
use bastion_dns_domain::ListFormat;
use rustc_hash::FxHashSet;

/// Host names that hosts files map to themselves.
const HOSTS_SELF_ENTRIES: &[&str] = &[
    "localhost",
    "localhost.localdomain",
    "local",
    "broadcasthost",
    "ip6-localhost",
    "ip6-loopback",
    "ip6-localnet",
    "ip6-mcastprefix",
    "ip6-allnodes",
    "ip6-allrouters",
    "ip6-allhosts",
    "0.0.0.0",
];

/// Extract the blocked domain of one list line, normalized.
///
/// Returns `None` for comments, blank lines, adblock exceptions (`@@`),
/// cosmetic rules, regex rules and anything that is not a valid domain.
pub fn parse_list_line(line: &str, format: ListFormat) -> Option<String> {
    let line = line.trim();

    if line.is_empty() || line.starts_with('#') || line.starts_with('!') || line.starts_with('[')
    {
        return None;
    }

    let raw = match format {
        ListFormat::Adblock => parse_adblock(line)?,
        ListFormat::Hosts => parse_hosts(strip_inline_comment(line))?,
        ListFormat::Domains => parse_plain(strip_inline_comment(line))?,
        ListFormat::Auto => {
            if line.starts_with("||") || line.starts_with("@@") || line.contains("##") {
                parse_adblock(line)?
            } else {
                let line = strip_inline_comment(line);
                let first = line.split_whitespace().next()?;
                if first.parse::<std::net::IpAddr>().is_ok() {
                    parse_hosts(line)?
                } else {
                    parse_plain(line)?
                }
            }
        }
    };

    let domain = normalize_domain(raw);
    if HOSTS_SELF_ENTRIES.contains(&domain.as_str()) || !domain.contains('.') {
        return None;
    }
    if !is_valid_domain(&domain, false) {
        return None;
    }
    Some(domain)
}

/// Parse a whole list, dropping duplicates while keeping first-seen order.
pub fn parse_list_text(text: &str, format: ListFormat) -> Vec<String> {
    let mut seen: FxHashSet<String> = FxHashSet::default();
    text.lines()
        .filter_map(|line| parse_list_line(line, format))
        .filter(|domain| seen.insert(domain.clone()))
        .collect()
}

fn strip_inline_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => line[..idx].trim_end(),
        None => line,
    }
}

/// `0.0.0.0 domain [domain…]`; only the first host name is taken.
fn parse_hosts(line: &str) -> Option<&str> {
    let mut parts = line.split_whitespace();
    let addr = parts.next()?;
    addr.parse::<std::net::IpAddr>().ok()?;
    parts.next()
}

fn parse_plain(line: &str) -> Option<&str> {
    let mut parts = line.split_whitespace();
    let domain = parts.next()?;
    if parts.next().is_some() || domain.starts_with("*.") {
        return None;
    }
    Some(domain)
}

/// `||domain^` with optional `$options`. Anything more specific than a whole
/// domain (paths, wildcards inside the name) is skipped.
fn parse_adblock(line: &str) -> Option<&str> {
    if line.starts_with("@@") || line.contains("##") || line.contains("#@#") {
        return None;
    }

    let rule = match line.find('$') {
        Some(idx) => &line[..idx],
        None => line,
    };
    let rule = rule.strip_prefix("||")?;
    let domain = rule.strip_suffix('^').unwrap_or(rule);

    if domain.contains(['/', '*', '^', '|']) {
        return None;
    }
    Some(domain)
}
