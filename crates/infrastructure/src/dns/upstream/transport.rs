use crate::dns::wire::message_id;
use bastion_dns_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, UdpSocket};
use tracing::{debug, warn};

/// Largest UDP answer accepted from an upstream.
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

/// Result of one exchange with an upstream.
#[derive(Debug)]
pub struct TransportResponse {
    pub bytes: Vec<u8>,
    pub protocol_used: &'static str,
}

fn timeout_error(server: SocketAddr, protocol: &str) -> DomainError {
    debug!(server = %server, protocol, "Upstream timeout");
    DomainError::QueryTimeout
}

fn io_error(server: SocketAddr, action: &str, e: std::io::Error) -> DomainError {
    DomainError::IoError(format!("{} {}: {}", action, server, e))
}

/// One query over a fresh, connected UDP socket.
///
/// Datagrams whose ID differs from the query's are ignored until the
/// deadline.
pub async fn udp_exchange(
    server: SocketAddr,
    query: &[u8],
    timeout: Duration,
) -> Result<TransportResponse, DomainError> {
    let bind_addr: SocketAddr = if server.is_ipv4() {
        SocketAddr::from(([0, 0, 0, 0], 0))
    } else {
        SocketAddr::from(([0u16; 8], 0))
    };
    let expected_id = message_id(query);

    let socket = UdpSocket::bind(bind_addr)
        .await
        .map_err(|e| io_error(server, "Failed to bind UDP socket for", e))?;
    socket
        .connect(server)
        .await
        .map_err(|e| io_error(server, "Failed to connect UDP socket to", e))?;

    tokio::time::timeout(timeout, udp_roundtrip(&socket, server, query, expected_id))
        .await
        .map_err(|_| timeout_error(server, "UDP"))?
}

async fn udp_roundtrip(
    socket: &UdpSocket,
    server: SocketAddr,
    query: &[u8],
    expected_id: Option<u16>,
) -> Result<TransportResponse, DomainError> {
    socket
        .send(query)
        .await
        .map_err(|e| io_error(server, "Failed to send UDP query to", e))?;

    let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
    loop {
        let len = socket
            .recv(&mut recv_buf)
            .await
            .map_err(|e| io_error(server, "Failed to receive UDP response from", e))?;

        if message_id(&recv_buf[..len]) != expected_id {
            warn!(server = %server, "UDP response with unexpected ID ignored");
            continue;
        }

        recv_buf.truncate(len);
        return Ok(TransportResponse {
            bytes: recv_buf,
            protocol_used: "UDP",
        });
    }
}

/// One query over TCP with 2-byte length framing.
pub async fn tcp_exchange(
    server: SocketAddr,
    query: &[u8],
    timeout: Duration,
) -> Result<TransportResponse, DomainError> {
    let length = u16::try_from(query.len())
        .map_err(|_| DomainError::InvalidDnsMessage("query exceeds 65535 bytes".to_string()))?;

    tokio::time::timeout(timeout, tcp_roundtrip(server, query, length))
        .await
        .map_err(|_| timeout_error(server, "TCP"))?
}

async fn tcp_roundtrip(
    server: SocketAddr,
    query: &[u8],
    length: u16,
) -> Result<TransportResponse, DomainError> {
    let mut stream = TcpStream::connect(server)
        .await
        .map_err(|e| io_error(server, "Failed to connect to", e))?;
    stream.set_nodelay(true).ok();

    let mut framed = Vec::with_capacity(query.len() + 2);
    framed.extend_from_slice(&length.to_be_bytes());
    framed.extend_from_slice(query);
    stream
        .write_all(&framed)
        .await
        .map_err(|e| io_error(server, "Failed to send TCP query to", e))?;

    let response_len = stream
        .read_u16()
        .await
        .map_err(|e| io_error(server, "Failed to read TCP length from", e))?;
    let mut bytes = vec![0u8; response_len as usize];
    stream
        .read_exact(&mut bytes)
        .await
        .map_err(|e| io_error(server, "Failed to read TCP response from", e))?;

    Ok(TransportResponse {
        bytes,
        protocol_used: "TCP",
    })
}
