pub mod controller;
pub mod listener;

pub use controller::DnsServerController;
pub use listener::DnsListener;
