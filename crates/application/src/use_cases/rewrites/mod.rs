pub mod create;
pub mod delete;
pub mod get;
pub mod update;

pub use create::CreateRewriteUseCase;
pub use delete::DeleteRewriteUseCase;
pub use get::GetRewritesUseCase;
pub use update::{RewriteChanges, UpdateRewriteUseCase};
