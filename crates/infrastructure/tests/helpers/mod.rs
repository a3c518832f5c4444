pub mod dns_server_mock;
pub mod fixtures;

pub use dns_server_mock::{first_a_record, MockBehavior, MockDnsServer};
pub use fixtures::{ip, TestStore};
