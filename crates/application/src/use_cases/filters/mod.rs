pub mod create;
pub mod delete;
pub mod get;

pub use create::CreateFilterUseCase;
pub use delete::DeleteFilterUseCase;
pub use get::GetFiltersUseCase;
