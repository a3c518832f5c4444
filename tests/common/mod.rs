#![allow(dead_code)]
pub mod client;
pub mod list_server;
pub mod test_server;
pub mod upstream;

pub use client::{AdminClient, DnsClient};
pub use list_server::ListServer;
pub use test_server::TestServer;
pub use upstream::Upstream;

use std::future::Future;
use std::time::Duration;

/// Polls `check` until it holds or two seconds pass. Rule changes reach the
/// engine through a background reload.
pub async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..40 {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    false
}
