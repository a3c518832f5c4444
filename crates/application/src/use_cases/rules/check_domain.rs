use crate::ports::FilterEnginePort;
use bastion_dns_domain::validators::{normalize_and_validate_domain, parse_client_ip};
use bastion_dns_domain::DomainError;
use std::sync::Arc;

/// The three independent lookups the UI uses to offer "Block" or "Allow".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainStatus {
    pub global_domain_block: bool,
    pub client_specific_block: bool,
    pub client_block: bool,
}

pub struct CheckDomainStatusUseCase {
    engine: Arc<dyn FilterEnginePort>,
}

impl CheckDomainStatusUseCase {
    pub fn new(engine: Arc<dyn FilterEnginePort>) -> Self {
        Self { engine }
    }

    pub fn execute(&self, domain: &str, client_ip: &str) -> Result<DomainStatus, DomainError> {
        let domain = normalize_and_validate_domain(domain, false)?;
        let ip = parse_client_ip(client_ip)?;

        Ok(DomainStatus {
            global_domain_block: self.engine.is_globally_blocked(&domain),
            client_specific_block: self.engine.is_client_blocked(ip, &domain),
            client_block: self.engine.is_client_banned(ip),
        })
    }
}
