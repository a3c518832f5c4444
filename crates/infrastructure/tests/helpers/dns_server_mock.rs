#![allow(dead_code)]
use hickory_proto::op::{Message, MessageType, OpCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{RData, Record};
use hickory_proto::serialize::binary::BinEncodable;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio_util::sync::CancellationToken;

/// How the mock upstream answers.
#[derive(Debug, Clone, Copy)]
pub enum MockBehavior {
    /// One A record.
    Answer(Ipv4Addr),
    /// UDP answers carry only the TC bit; TCP answers carry the A record.
    TruncateUdp(Ipv4Addr),
    /// `n` A records, enough to exceed a 512-byte datagram.
    Large(usize),
    /// Never answers.
    Silent,
}

/// Upstream DNS server on 127.0.0.1 serving UDP and TCP on one port.
pub struct MockDnsServer {
    addr: SocketAddr,
    udp_queries: Arc<AtomicUsize>,
    tcp_queries: Arc<AtomicUsize>,
    shutdown: CancellationToken,
}

impl MockDnsServer {
    pub async fn start(behavior: MockBehavior) -> std::io::Result<Self> {
        let udp = UdpSocket::bind("127.0.0.1:0").await?;
        let addr = udp.local_addr()?;
        let tcp = TcpListener::bind(addr).await?;

        let shutdown = CancellationToken::new();
        let udp_queries = Arc::new(AtomicUsize::new(0));
        let tcp_queries = Arc::new(AtomicUsize::new(0));

        tokio::spawn(Self::serve_udp(
            udp,
            behavior,
            Arc::clone(&udp_queries),
            shutdown.clone(),
        ));
        tokio::spawn(Self::serve_tcp(
            tcp,
            behavior,
            Arc::clone(&tcp_queries),
            shutdown.clone(),
        ));

        Ok(Self {
            addr,
            udp_queries,
            tcp_queries,
            shutdown,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn udp_queries(&self) -> usize {
        self.udp_queries.load(Ordering::SeqCst)
    }

    pub fn tcp_queries(&self) -> usize {
        self.tcp_queries.load(Ordering::SeqCst)
    }

    async fn serve_udp(
        socket: UdpSocket,
        behavior: MockBehavior,
        counter: Arc<AtomicUsize>,
        shutdown: CancellationToken,
    ) {
        let mut buf = vec![0u8; 4096];
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                result = socket.recv_from(&mut buf) => {
                    let Ok((len, peer)) = result else { continue };
                    counter.fetch_add(1, Ordering::SeqCst);
                    if let Some(response) = build_response(&buf[..len], behavior, false) {
                        let _ = socket.send_to(&response, peer).await;
                    }
                }
            }
        }
    }

    async fn serve_tcp(
        listener: TcpListener,
        behavior: MockBehavior,
        counter: Arc<AtomicUsize>,
        shutdown: CancellationToken,
    ) {
        loop {
            let accepted = tokio::select! {
                _ = shutdown.cancelled() => break,
                accepted = listener.accept() => accepted,
            };
            let Ok((mut stream, _)) = accepted else { continue };
            let counter = Arc::clone(&counter);

            tokio::spawn(async move {
                let Ok(len) = stream.read_u16().await else { return };
                let mut query = vec![0u8; len as usize];
                if stream.read_exact(&mut query).await.is_err() {
                    return;
                }
                counter.fetch_add(1, Ordering::SeqCst);

                if let Some(response) = build_response(&query, behavior, true) {
                    let _ = stream.write_all(&(response.len() as u16).to_be_bytes()).await;
                    let _ = stream.write_all(&response).await;
                }
            });
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn build_response(query: &[u8], behavior: MockBehavior, over_tcp: bool) -> Option<Vec<u8>> {
    let request = Message::from_vec(query).ok()?;
    let name = request.queries().first()?.name().clone();

    let mut response = Message::new(request.id(), MessageType::Response, OpCode::Query);
    response.set_recursion_desired(request.recursion_desired());
    response.set_recursion_available(true);
    for q in request.queries() {
        response.add_query(q.clone());
    }

    match behavior {
        MockBehavior::Answer(ip) => {
            response.add_answer(Record::from_rdata(name, 60, RData::A(A(ip))));
        }
        MockBehavior::TruncateUdp(ip) => {
            if over_tcp {
                response.add_answer(Record::from_rdata(name, 60, RData::A(A(ip))));
            } else {
                response.set_truncated(true);
            }
        }
        MockBehavior::Large(count) => {
            for i in 0..count {
                let ip = Ipv4Addr::new(10, 0, (i / 256) as u8, (i % 256) as u8);
                response.add_answer(Record::from_rdata(name.clone(), 60, RData::A(A(ip))));
            }
        }
        MockBehavior::Silent => return None,
    }

    response.to_vec().ok()
}

/// First A record of a raw answer.
pub fn first_a_record(bytes: &[u8]) -> Option<Ipv4Addr> {
    let message = Message::from_vec(bytes).ok()?;
    message.answers().iter().find_map(|record| match record.data() {
        RData::A(a) => Some(a.0),
        _ => None,
    })
}
