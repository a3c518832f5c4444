pub mod check_domain;
pub mod get_all;

pub use check_domain::{CheckDomainStatusUseCase, DomainStatus};
pub use get_all::{CustomRulesView, GetCustomRulesUseCase};
