pub mod create;
pub mod delete;
pub mod get;

pub use create::CreateClientRuleUseCase;
pub use delete::DeleteClientRuleUseCase;
pub use get::GetClientRulesUseCase;
