use crate::domain_name::{is_valid_domain, normalize_domain};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;
use std::sync::Arc;

/// Record type a [`Rewrite`] answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RewriteType {
    A,
    AAAA,
    CNAME,
}

impl RewriteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RewriteType::A => "A",
            RewriteType::AAAA => "AAAA",
            RewriteType::CNAME => "CNAME",
        }
    }
}

impl fmt::Display for RewriteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RewriteType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(RewriteType::A),
            "AAAA" => Ok(RewriteType::AAAA),
            "CNAME" => Ok(RewriteType::CNAME),
            other => Err(format!("type must be A, AAAA, or CNAME, got '{}'", other)),
        }
    }
}

/// Static answer override for a domain/record-type pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rewrite {
    pub id: Option<i64>,
    /// Normalized; may start with `*.` to cover subdomains.
    pub domain: Arc<str>,
    pub record_type: RewriteType,
    pub answer: Arc<str>,
    pub enabled: bool,
    pub comment: Option<Arc<str>>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Rewrite {
    pub fn new(
        domain: Arc<str>,
        record_type: RewriteType,
        answer: Arc<str>,
        enabled: bool,
        comment: Option<Arc<str>>,
    ) -> Self {
        Self {
            id: None,
            domain,
            record_type,
            answer,
            enabled,
            comment,
            created_at: None,
            updated_at: None,
        }
    }

    /// Checks that `answer` is usable for `record_type` and returns its
    /// canonical form.
    ///
    /// An answer equal to the record type itself (`"A"` for an A rewrite)
    /// means "keep the upstream answer" and is accepted as-is; the compiler
    /// skips such rows.
    pub fn validate_answer(record_type: RewriteType, answer: &str) -> Result<String, String> {
        let answer = answer.trim();
        if answer.is_empty() {
            return Err("answer is required".to_string());
        }
        if answer.eq_ignore_ascii_case(record_type.as_str()) && record_type != RewriteType::CNAME
        {
            return Ok(record_type.as_str().to_string());
        }

        match record_type {
            RewriteType::A => answer
                .parse::<Ipv4Addr>()
                .map(|ip| ip.to_string())
                .map_err(|_| format!("answer '{}' is not an IPv4 address", answer)),
            RewriteType::AAAA => answer
                .parse::<Ipv6Addr>()
                .map(|ip| ip.to_string())
                .map_err(|_| format!("answer '{}' is not an IPv6 address", answer)),
            RewriteType::CNAME => {
                let target = normalize_domain(answer);
                if is_valid_domain(&target, false) {
                    Ok(target)
                } else {
                    Err(format!("answer '{}' is not a valid domain name", answer))
                }
            }
        }
    }

    /// True when this row keeps the upstream answer instead of replacing it.
    pub fn is_passthrough(&self) -> bool {
        self.record_type != RewriteType::CNAME
            && self.answer.eq_ignore_ascii_case(self.record_type.as_str())
    }
}
