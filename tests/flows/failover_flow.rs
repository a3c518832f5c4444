#[path = "../common/mod.rs"]
mod common;

use common::{AdminClient, DnsClient, TestServer, Upstream};
use hickory_proto::op::ResponseCode;
use std::net::Ipv4Addr;

// ============================================================================
// Upstream failover
// ============================================================================

#[tokio::test]
async fn test_dead_primary_fails_over_to_secondary() {
    // Arrange
    let dead = Upstream::silent().await;
    let alive = Upstream::answering(Ipv4Addr::new(10, 9, 9, 9)).await;
    let server = TestServer::start(&[dead.addr(), alive.addr()]).await;
    let dns = DnsClient::new(server.dns_addr());
    let admin = AdminClient::new(server.web_addr());

    // Act
    let first = dns.resolve("example.com").await;
    let second = dns.resolve("example.net").await;

    // Assert
    assert_eq!(first, Some(Ipv4Addr::new(10, 9, 9, 9)));
    assert_eq!(second, Some(Ipv4Addr::new(10, 9, 9, 9)));
    assert_eq!(dead.queries(), 1, "cooling upstream must be skipped");

    let (_, status) = admin.get("/status").await;
    assert_eq!(status["upstreams"][0]["healthy"], false);
    assert_eq!(status["upstreams"][1]["healthy"], true);

    server.shutdown().await;
}

#[tokio::test]
async fn test_all_upstreams_dead_answers_servfail() {
    let dead = Upstream::silent().await;
    let server = TestServer::start(&[dead.addr()]).await;
    let dns = DnsClient::new(server.dns_addr());

    let answer = dns.query("example.com").await.unwrap();

    assert_eq!(answer.response_code(), ResponseCode::ServFail);
    server.shutdown().await;
}

// ============================================================================
// Server control over HTTP
// ============================================================================

#[tokio::test]
async fn test_stop_and_start_through_admin_api() {
    // Arrange
    let upstream = Upstream::answering(Ipv4Addr::new(10, 1, 1, 1)).await;
    let server = TestServer::start(&[upstream.addr()]).await;
    let dns = DnsClient::new(server.dns_addr());
    let admin = AdminClient::new(server.web_addr());

    // Act
    let (stopped, _) = admin.post_empty("/stop").await;

    // Assert
    assert_eq!(stopped, 204);
    assert!(dns.query("example.com").await.is_none());
    let (_, status) = admin.get("/status").await;
    assert_eq!(status["running"], false);

    // Act
    let (started, _) = admin.post_empty("/start").await;
    let (again, _) = admin.post_empty("/start").await;

    // Assert
    assert_eq!(started, 204);
    assert_eq!(again, 409);
    let (_, status) = admin.get("/status").await;
    assert_eq!(status["running"], true);

    server.shutdown().await;
}
