pub mod create;
pub mod delete;
pub mod get;
pub mod refresh;
pub mod seed;
pub mod update;

pub use create::CreateBlocklistUseCase;
pub use delete::DeleteBlocklistUseCase;
pub use get::GetBlocklistsUseCase;
pub use refresh::{RefreshBlocklistsUseCase, RefreshSummary};
pub use seed::SeedDefaultBlocklistsUseCase;
pub use update::UpdateBlocklistUseCase;
