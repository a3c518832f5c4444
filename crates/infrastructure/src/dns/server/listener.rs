use crate::dns::handler::{Protocol, QueryHandler};
use bastion_dns_domain::DomainError;
use socket2::{Domain, Socket, Type};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

/// Largest datagram read from a client.
const MAX_UDP_MESSAGE_SIZE: usize = 4096;

const UDP_RECV_BUFFER: usize = 4 * 1024 * 1024;

/// Idle time before an open TCP connection is closed.
const TCP_IDLE_TIMEOUT: Duration = Duration::from_secs(10);

const MIN_DNS_MESSAGE_SIZE: usize = 12;

/// Bound UDP socket and TCP listener sharing one address.
pub struct DnsListener {
    udp: Arc<UdpSocket>,
    tcp: TcpListener,
    local_addr: SocketAddr,
}

impl DnsListener {
    /// Bind UDP first, then TCP on the same port (the UDP port when `addr`
    /// asks for an ephemeral one).
    pub async fn bind(addr: SocketAddr) -> Result<Self, DomainError> {
        let udp = bind_udp(addr)
            .map_err(|e| DomainError::IoError(format!("Failed to bind UDP {}: {}", addr, e)))?;
        let local_addr = udp
            .local_addr()
            .map_err(|e| DomainError::IoError(e.to_string()))?;

        let tcp = TcpListener::bind(local_addr)
            .await
            .map_err(|e| DomainError::IoError(format!("Failed to bind TCP {}: {}", local_addr, e)))?;

        info!(bind_address = %local_addr, "DNS listeners bound");
        Ok(Self {
            udp: Arc::new(udp),
            tcp,
            local_addr,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Spawn both accept loops on `tracker`. Each datagram and each TCP
    /// connection is served by its own tracked task.
    pub fn spawn(self, handler: Arc<QueryHandler>, cancel: CancellationToken, tracker: &TaskTracker) {
        tracker.spawn(serve_udp(
            self.udp,
            Arc::clone(&handler),
            cancel.clone(),
            tracker.clone(),
        ));
        tracker.spawn(serve_tcp(self.tcp, handler, cancel, tracker.clone()));
    }
}

fn bind_udp(addr: SocketAddr) -> io::Result<UdpSocket> {
    let socket = Socket::new(
        Domain::for_address(addr),
        Type::DGRAM,
        Some(socket2::Protocol::UDP),
    )?;
    socket.set_reuse_address(true)?;
    if let Err(e) = socket.set_recv_buffer_size(UDP_RECV_BUFFER) {
        debug!(error = %e, "Could not enlarge UDP receive buffer");
    }
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    UdpSocket::from_std(socket.into())
}

async fn serve_udp(
    socket: Arc<UdpSocket>,
    handler: Arc<QueryHandler>,
    cancel: CancellationToken,
    tracker: TaskTracker,
) {
    let mut buf = vec![0u8; MAX_UDP_MESSAGE_SIZE];

    loop {
        let (len, peer) = tokio::select! {
            _ = cancel.cancelled() => break,
            result = socket.recv_from(&mut buf) => match result {
                Ok(received) => received,
                Err(e) => {
                    // ICMP port unreachable surfaces here on some platforms
                    debug!(error = %e, "UDP receive failed");
                    continue;
                }
            },
        };

        let packet = buf[..len].to_vec();
        let socket = Arc::clone(&socket);
        let handler = Arc::clone(&handler);

        tracker.spawn(async move {
            let Some(answer) = handler.handle(&packet, peer.ip(), Protocol::Udp).await else {
                return;
            };
            if let Err(e) = socket.send_to(&answer, peer).await {
                debug!(peer = %peer, error = %e, "Failed to send UDP answer");
            }
        });
    }

    info!("UDP listener stopped");
}

async fn serve_tcp(
    listener: TcpListener,
    handler: Arc<QueryHandler>,
    cancel: CancellationToken,
    tracker: TaskTracker,
) {
    loop {
        let (stream, peer) = tokio::select! {
            _ = cancel.cancelled() => break,
            result = listener.accept() => match result {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!(error = %e, "TCP accept failed");
                    continue;
                }
            },
        };

        let handler = Arc::clone(&handler);
        let cancel = cancel.clone();
        tracker.spawn(async move {
            if let Err(e) = serve_connection(stream, peer, handler, cancel).await {
                debug!(peer = %peer, error = %e, "TCP connection closed with error");
            }
        });
    }

    info!("TCP listener stopped");
}

/// Serve length-framed queries on one connection until the peer closes it,
/// it idles out, or the listener is cancelled.
async fn serve_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    handler: Arc<QueryHandler>,
    cancel: CancellationToken,
) -> io::Result<()> {
    stream.set_nodelay(true).ok();

    loop {
        let message = tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            read = tokio::time::timeout(TCP_IDLE_TIMEOUT, read_message(&mut stream)) => match read {
                Ok(Ok(Some(message))) => message,
                Ok(Ok(None)) => return Ok(()),
                Ok(Err(e)) => return Err(e),
                Err(_) => {
                    debug!(peer = %peer, "TCP connection idle timeout");
                    return Ok(());
                }
            },
        };

        if let Some(answer) = handler.handle(&message, peer.ip(), Protocol::Tcp).await {
            write_message(&mut stream, &answer).await?;
        }
    }
}

/// Next framed message, or `None` on a clean close.
async fn read_message(stream: &mut TcpStream) -> io::Result<Option<Vec<u8>>> {
    let len = match stream.read_u16().await {
        Ok(len) => len as usize,
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e),
    };

    if len < MIN_DNS_MESSAGE_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("message too small: {} bytes", len),
        ));
    }

    let mut message = vec![0u8; len];
    stream.read_exact(&mut message).await?;
    Ok(Some(message))
}

async fn write_message(stream: &mut TcpStream, message: &[u8]) -> io::Result<()> {
    let len = u16::try_from(message.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "answer exceeds 65535 bytes"))?;

    let mut framed = Vec::with_capacity(message.len() + 2);
    framed.extend_from_slice(&len.to_be_bytes());
    framed.extend_from_slice(message);
    stream.write_all(&framed).await?;
    stream.flush().await
}
