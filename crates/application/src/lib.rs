//! Bastion DNS Application Layer
//!
//! Ports implemented by the infrastructure crate and the use cases the admin
//! API and background jobs call.
pub mod ports;
pub mod use_cases;
