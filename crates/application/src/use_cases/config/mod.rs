pub mod get;
pub mod update;

pub use get::GetConfigUseCase;
pub use update::UpdateConfigUseCase;
