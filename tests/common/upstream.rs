use hickory_proto::op::{Message, MessageType, OpCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{RData, Record};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;

/// UDP resolver on 127.0.0.1 that answers every A query with one address,
/// or never answers when built with [`Upstream::silent`].
pub struct Upstream {
    addr: SocketAddr,
    queries: Arc<AtomicUsize>,
    shutdown: CancellationToken,
}

impl Upstream {
    pub async fn answering(ip: Ipv4Addr) -> Self {
        Self::start(Some(ip)).await
    }

    pub async fn silent() -> Self {
        Self::start(None).await
    }

    async fn start(answer: Option<Ipv4Addr>) -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();
        let queries = Arc::new(AtomicUsize::new(0));
        let shutdown = CancellationToken::new();

        let counter = Arc::clone(&queries);
        let token = shutdown.clone();
        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];
            loop {
                let (len, peer) = tokio::select! {
                    _ = token.cancelled() => break,
                    received = socket.recv_from(&mut buf) => match received {
                        Ok(received) => received,
                        Err(_) => continue,
                    },
                };
                counter.fetch_add(1, Ordering::SeqCst);
                let Some(ip) = answer else { continue };
                if let Some(reply) = reply(&buf[..len], ip) {
                    let _ = socket.send_to(&reply, peer).await;
                }
            }
        });

        Self {
            addr,
            queries,
            shutdown,
        }
    }

    pub fn addr(&self) -> String {
        self.addr.to_string()
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl Drop for Upstream {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn reply(query: &[u8], ip: Ipv4Addr) -> Option<Vec<u8>> {
    let request = Message::from_vec(query).ok()?;
    let name = request.queries().first()?.name().clone();

    let mut response = Message::new(request.id(), MessageType::Response, OpCode::Query);
    response.set_recursion_desired(true);
    response.set_recursion_available(true);
    for q in request.queries() {
        response.add_query(q.clone());
    }
    response.add_answer(Record::from_rdata(name, 60, RData::A(A(ip))));
    response.to_vec().ok()
}
