use crate::domain_name::{is_valid_domain, normalize_domain};
use crate::DomainError;
use std::net::IpAddr;

pub fn validate_source_name(name: &str, entity: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err(format!("{entity} name cannot be empty"));
    }
    if name.len() > 200 {
        return Err(format!("{entity} name cannot exceed 200 characters"));
    }
    Ok(())
}

pub fn validate_url(url: &str) -> Result<(), String> {
    if url.len() > 2048 {
        return Err("URL cannot exceed 2048 characters".to_string());
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err("URL must start with http:// or https://".to_string());
    }
    Ok(())
}

pub fn validate_comment(comment: Option<&str>) -> Result<(), String> {
    if let Some(c) = comment {
        if c.len() > 500 {
            return Err("Comment cannot exceed 500 characters".to_string());
        }
    }
    Ok(())
}

/// Normalizes `raw` and rejects it unless it is a syntactically valid domain.
pub fn normalize_and_validate_domain(
    raw: &str,
    allow_wildcard: bool,
) -> Result<String, DomainError> {
    let domain = normalize_domain(raw);
    if domain.is_empty() {
        return Err(DomainError::InvalidDomainName(
            "domain is required".to_string(),
        ));
    }
    if !is_valid_domain(&domain, allow_wildcard) {
        return Err(DomainError::InvalidDomainName(format!(
            "'{}' is not a valid domain name",
            raw.trim()
        )));
    }
    Ok(domain)
}

pub fn parse_client_ip(raw: &str) -> Result<IpAddr, DomainError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DomainError::InvalidIpAddress(
            "client_ip is required".to_string(),
        ));
    }
    // IPv4-mapped IPv6 addresses collapse to their IPv4 form.
    raw.parse::<IpAddr>()
        .map(|ip| ip.to_canonical())
        .map_err(|_| DomainError::InvalidIpAddress(format!("'{}' is not an IP address", raw)))
}
