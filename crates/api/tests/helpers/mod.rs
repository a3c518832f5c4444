#![allow(dead_code)]
pub mod app;
pub mod mocks;

pub use app::*;
pub use mocks::*;
