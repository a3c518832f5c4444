#[path = "../common/mod.rs"]
mod common;

use common::{eventually, AdminClient, DnsClient, ListServer, TestServer, Upstream};
use serde_json::json;
use std::net::Ipv4Addr;

const UPSTREAM_IP: Ipv4Addr = Ipv4Addr::new(93, 184, 216, 34);

struct Harness {
    server: TestServer,
    dns: DnsClient,
    admin: AdminClient,
    _upstream: Upstream,
}

async fn harness() -> Harness {
    let upstream = Upstream::answering(UPSTREAM_IP).await;
    let server = TestServer::start(&[upstream.addr()]).await;
    Harness {
        dns: DnsClient::new(server.dns_addr()),
        admin: AdminClient::new(server.web_addr()),
        server,
        _upstream: upstream,
    }
}

// ============================================================================
// Rules edited over HTTP change DNS answers
// ============================================================================

#[tokio::test]
async fn test_custom_blacklist_blocks_after_reload() {
    // Arrange
    let h = harness().await;
    assert_eq!(h.dns.resolve("tracker.example.com").await, Some(UPSTREAM_IP));

    // Act
    let (status, _) = h
        .admin
        .post(
            "/filters",
            json!({ "domain": "example.com", "kind": "blacklist" }),
        )
        .await;

    // Assert
    assert_eq!(status, 201);
    assert!(eventually(|| h.dns.is_blocked("tracker.example.com")).await);
    assert_eq!(h.dns.resolve("example.org").await, Some(UPSTREAM_IP));

    h.server.shutdown().await;
}

#[tokio::test]
async fn test_subscribed_hosts_list_blocks_until_whitelisted() {
    // Arrange
    let h = harness().await;
    let list = ListServer::start("# ads\n0.0.0.0 ads.test\n127.0.0.1 localhost\n").await;

    // Act: subscribe
    let (status, _) = h
        .admin
        .post(
            "/blocklists",
            json!({ "name": "ads", "url": list.url(), "format": "hosts" }),
        )
        .await;

    // Assert: the background refresh downloads and compiles the list
    assert_eq!(status, 201);
    assert!(eventually(|| h.dns.is_blocked("cdn.ads.test")).await);
    assert!(!h.dns.is_blocked("localhost").await);

    // Act: carve out an exception
    h.admin
        .post("/filters", json!({ "domain": "cdn.ads.test", "kind": "whitelist" }))
        .await;

    // Assert
    assert!(eventually(|| async { h.dns.resolve("cdn.ads.test").await == Some(UPSTREAM_IP) }).await);
    assert!(h.dns.is_blocked("ads.test").await);

    let (_, lists) = h.admin.get("/blocklists").await;
    assert_eq!(lists[0]["domain_count"], 1);

    h.server.shutdown().await;
}

#[tokio::test]
async fn test_rewrite_answers_locally() {
    let h = harness().await;

    let (status, _) = h
        .admin
        .post(
            "/rewrites",
            json!({ "domain": "nas.lan", "record_type": "A", "answer": "10.0.0.5" }),
        )
        .await;

    assert_eq!(status, 201);
    assert!(
        eventually(|| async { h.dns.resolve("nas.lan").await == Some(Ipv4Addr::new(10, 0, 0, 5)) })
            .await
    );

    h.server.shutdown().await;
}

#[tokio::test]
async fn test_banned_client_refused_until_unbanned() {
    // Arrange
    let h = harness().await;

    // Act
    let (status, _) = h
        .admin
        .post("/clients/block", json!({ "client_ip": "127.0.0.1" }))
        .await;

    // Assert
    assert_eq!(status, 200);
    assert!(h.dns.is_blocked("example.org").await);

    // Act
    let (status, _) = h.admin.post_empty("/clients/127.0.0.1/unblock").await;

    // Assert
    assert_eq!(status, 200);
    assert_eq!(h.dns.resolve("example.org").await, Some(UPSTREAM_IP));

    h.server.shutdown().await;
}

#[tokio::test]
async fn test_client_allow_rule_overrides_global_block() {
    let h = harness().await;
    h.admin
        .post("/filters", json!({ "domain": "social.test", "kind": "blacklist" }))
        .await;
    assert!(eventually(|| h.dns.is_blocked("social.test")).await);

    h.admin
        .post(
            "/client-rules",
            json!({ "client_ip": "127.0.0.1", "domain": "social.test", "kind": "allow" }),
        )
        .await;

    assert!(eventually(|| async { h.dns.resolve("social.test").await == Some(UPSTREAM_IP) }).await);
    let (_, status) = h
        .admin
        .get("/check-domain-status?domain=social.test&client_ip=127.0.0.1")
        .await;
    assert_eq!(status["global_domain_block"], true);
    assert_eq!(status["client_specific_block"], false);
    assert_eq!(status["client_block"], false);

    h.server.shutdown().await;
}

// ============================================================================
// Observability
// ============================================================================

#[tokio::test]
async fn test_queries_show_up_in_logs_stats_and_clients() {
    // Arrange
    let h = harness().await;
    h.admin
        .post("/filters", json!({ "domain": "ads.test", "kind": "blacklist" }))
        .await;
    assert!(eventually(|| h.dns.is_blocked("ads.test")).await);

    // Act
    h.dns.resolve("example.org").await;

    // Assert
    assert!(
        eventually(|| async {
            let (_, page) = h.admin.get("/logs?limit=10").await;
            page["total"].as_u64().unwrap_or(0) >= 2
        })
        .await
    );

    let (status, stats) = h.admin.get("/stats").await;
    assert_eq!(status, 200);
    assert!(stats["total_queries"].as_u64().unwrap() >= 2);
    assert!(stats["blocked_queries"].as_u64().unwrap() >= 1);
    assert!(stats["forwarded_queries"].as_u64().unwrap() >= 1);

    let (_, clients) = h.admin.get("/clients").await;
    assert_eq!(clients[0]["client_ip"], "127.0.0.1");

    h.server.shutdown().await;
}
