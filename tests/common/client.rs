use bastion_dns_domain::RecordType;
use bastion_dns_infrastructure::dns::wire::build_query;
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::RData;
use serde_json::Value;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;

/// Stub resolver talking to the server under test over UDP.
pub struct DnsClient {
    server: SocketAddr,
}

impl DnsClient {
    pub fn new(server: SocketAddr) -> Self {
        Self { server }
    }

    pub async fn query(&self, domain: &str) -> Option<Message> {
        let socket = UdpSocket::bind("127.0.0.1:0").await.ok()?;
        let query = build_query(0x5151, domain, RecordType::A).ok()?;
        socket.send_to(&query, self.server).await.ok()?;

        let mut buf = vec![0u8; 4096];
        let (len, _) = tokio::time::timeout(Duration::from_secs(2), socket.recv_from(&mut buf))
            .await
            .ok()?
            .ok()?;
        Message::from_vec(&buf[..len]).ok()
    }

    /// First A record of the answer, if any.
    pub async fn resolve(&self, domain: &str) -> Option<Ipv4Addr> {
        let message = self.query(domain).await?;
        message.answers().iter().find_map(|record| match record.data() {
            RData::A(a) => Some(a.0),
            _ => None,
        })
    }

    pub async fn is_blocked(&self, domain: &str) -> bool {
        matches!(
            self.query(domain).await.map(|m| m.response_code()),
            Some(ResponseCode::NXDomain)
        )
    }
}

/// JSON client for the admin API.
pub struct AdminClient {
    base: String,
    http: reqwest::Client,
}

impl AdminClient {
    pub fn new(web: SocketAddr) -> Self {
        Self {
            base: format!("http://{}/api/dns", web),
            http: reqwest::Client::new(),
        }
    }

    pub async fn get(&self, path: &str) -> (u16, Value) {
        self.send(self.http.get(self.url(path))).await
    }

    pub async fn post(&self, path: &str, body: Value) -> (u16, Value) {
        self.send(
            self.http
                .post(self.url(path))
                .header("content-type", "application/json")
                .body(body.to_string()),
        )
        .await
    }

    pub async fn post_empty(&self, path: &str) -> (u16, Value) {
        self.send(self.http.post(self.url(path))).await
    }

    pub async fn delete(&self, path: &str) -> (u16, Value) {
        self.send(self.http.delete(self.url(path))).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> (u16, Value) {
        let response = request.send().await.unwrap();
        let status = response.status().as_u16();
        let text = response.text().await.unwrap();
        let value = serde_json::from_str(&text).unwrap_or(Value::String(text));
        (status, value)
    }
}
