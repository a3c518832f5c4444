pub mod ban;
pub mod get_clients;
pub mod unban;

pub use ban::BanClientUseCase;
pub use get_clients::GetClientsUseCase;
pub use unban::UnbanClientUseCase;
