//! DNS wire codec.
//!
//! Parses inbound queries and synthesizes the answers the resolver produces
//! locally (blocks, rewrites, errors). Upstream answers are never decoded
//! here; they are relayed as raw bytes.

use bastion_dns_domain::config::BlockingMode;
use bastion_dns_domain::domain_name::normalize_domain;
use bastion_dns_domain::{DomainError, RecordType, RewriteType};
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::rdata::{A, AAAA, CNAME};
use hickory_proto::rr::{Name, RData, Record};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Largest UDP answer a client without EDNS accepts.
pub const MIN_UDP_PAYLOAD: usize = 512;

const DNS_HEADER_LEN: usize = 12;

/// The first question of an inbound query.
#[derive(Debug, Clone)]
pub struct ParsedQuery {
    pub id: u16,
    /// Normalized query name.
    pub domain: String,
    pub query_type: RecordType,
    pub recursion_desired: bool,
    /// Largest UDP answer the client advertised (at least 512).
    pub max_payload: usize,
    pub message: Message,
}

impl ParsedQuery {
    fn question(&self) -> Option<&Query> {
        self.message.queries().first()
    }
}

/// Outcome of decoding an inbound packet.
#[derive(Debug)]
pub enum InboundPacket {
    Query(ParsedQuery),
    /// Well-formed message with an empty question section.
    NoQuestion(Message),
}

/// Decode an inbound query.
///
/// `Err` means the packet should be dropped without an answer: it is not DNS,
/// or it is a response rather than a query.
pub fn parse_query(bytes: &[u8]) -> Result<InboundPacket, DomainError> {
    if bytes.len() < DNS_HEADER_LEN {
        return Err(DomainError::InvalidDnsMessage(format!(
            "packet too short ({} bytes)",
            bytes.len()
        )));
    }

    let message = Message::from_vec(bytes)
        .map_err(|e| DomainError::InvalidDnsMessage(e.to_string()))?;

    if message.message_type() != MessageType::Query {
        return Err(DomainError::InvalidDnsMessage(
            "packet is a response".to_string(),
        ));
    }

    let Some(query) = message.queries().first() else {
        return Ok(InboundPacket::NoQuestion(message));
    };

    let domain = normalize_domain(&query.name().to_utf8());
    let query_type = RecordType::from_u16(u16::from(query.query_type()));

    Ok(InboundPacket::Query(ParsedQuery {
        id: message.id(),
        domain,
        query_type,
        recursion_desired: message.recursion_desired(),
        max_payload: (message.max_payload() as usize).max(MIN_UDP_PAYLOAD),
        message,
    }))
}

/// Whether a raw DNS message has the TC bit set.
pub fn is_truncated(bytes: &[u8]) -> bool {
    bytes.len() > 2 && bytes[2] & 0x02 != 0
}

/// ID of a raw DNS message.
pub fn message_id(bytes: &[u8]) -> Option<u16> {
    (bytes.len() >= 2).then(|| u16::from_be_bytes([bytes[0], bytes[1]]))
}

fn response_to(request: &Message, rcode: ResponseCode) -> Message {
    let mut response = Message::new(request.id(), MessageType::Response, request.op_code());
    response.set_recursion_desired(request.recursion_desired());
    response.set_recursion_available(true);
    response.set_response_code(rcode);
    for query in request.queries() {
        response.add_query(query.clone());
    }
    response
}

fn encode(message: &Message) -> Result<Vec<u8>, DomainError> {
    let mut buf = Vec::with_capacity(MIN_UDP_PAYLOAD);
    let mut encoder = BinEncoder::new(&mut buf);
    message
        .emit(&mut encoder)
        .map_err(|e| DomainError::InvalidDnsMessage(format!("Failed to serialize DNS message: {}", e)))?;
    Ok(buf)
}

pub fn formerr(request: &Message) -> Result<Vec<u8>, DomainError> {
    encode(&response_to(request, ResponseCode::FormErr))
}

pub fn servfail(query: &ParsedQuery) -> Result<Vec<u8>, DomainError> {
    encode(&response_to(&query.message, ResponseCode::ServFail))
}

pub fn nxdomain(query: &ParsedQuery) -> Result<Vec<u8>, DomainError> {
    encode(&response_to(&query.message, ResponseCode::NXDomain))
}

/// Answer for a blocked query in the configured mode.
///
/// `null_ip` answers A with `0.0.0.0`, AAAA with `::` and every other type
/// with an empty NOERROR.
pub fn blocked(query: &ParsedQuery, mode: BlockingMode, ttl: u32) -> Result<Vec<u8>, DomainError> {
    match mode {
        BlockingMode::Nxdomain => nxdomain(query),
        BlockingMode::NullIp => {
            let mut response = response_to(&query.message, ResponseCode::NoError);
            response.set_authoritative(true);
            if let Some(question) = query.question() {
                let rdata = match query.query_type {
                    RecordType::A => Some(RData::A(A(Ipv4Addr::UNSPECIFIED))),
                    RecordType::AAAA => Some(RData::AAAA(AAAA(Ipv6Addr::UNSPECIFIED))),
                    _ => None,
                };
                if let Some(rdata) = rdata {
                    response.add_answer(Record::from_rdata(question.name().clone(), ttl, rdata));
                }
            }
            encode(&response)
        }
    }
}

/// Authoritative answer for a matched rewrite.
///
/// A CNAME rewrite answers A, AAAA and CNAME queries with a CNAME record.
pub fn rewrite(
    query: &ParsedQuery,
    record_type: RewriteType,
    answer: &str,
    ttl: u32,
) -> Result<Vec<u8>, DomainError> {
    let question = query
        .question()
        .ok_or_else(|| DomainError::InvalidDnsMessage("query has no question".to_string()))?;

    let rdata = match record_type {
        RewriteType::A => RData::A(A(answer.parse::<Ipv4Addr>().map_err(|_| {
            DomainError::InvalidInput(format!("rewrite answer '{}' is not IPv4", answer))
        })?)),
        RewriteType::AAAA => RData::AAAA(AAAA(answer.parse::<Ipv6Addr>().map_err(|_| {
            DomainError::InvalidInput(format!("rewrite answer '{}' is not IPv6", answer))
        })?)),
        RewriteType::CNAME => {
            let target = Name::from_str(&format!("{}.", answer.trim_end_matches('.')))
                .map_err(|e| {
                    DomainError::InvalidDomainName(format!("Invalid CNAME '{}': {}", answer, e))
                })?;
            RData::CNAME(CNAME(target))
        }
    };

    let mut response = response_to(&query.message, ResponseCode::NoError);
    response.set_authoritative(true);
    response.add_answer(Record::from_rdata(question.name().clone(), ttl, rdata));
    encode(&response)
}

/// Header and question only, with TC set, so the client retries over TCP.
pub fn truncated(query: &ParsedQuery) -> Result<Vec<u8>, DomainError> {
    let mut response = response_to(&query.message, ResponseCode::NoError);
    response.set_truncated(true);
    encode(&response)
}

/// Standalone query message for a single question.
pub fn build_query(id: u16, domain: &str, query_type: RecordType) -> Result<Vec<u8>, DomainError> {
    let name = Name::from_str(&format!("{}.", domain.trim_end_matches('.'))).map_err(|e| {
        DomainError::InvalidDomainName(format!("Invalid domain '{}': {}", domain, e))
    })?;

    let mut query = Query::new();
    query.set_name(name);
    query.set_query_type(hickory_proto::rr::RecordType::from(query_type.to_u16()));
    query.set_query_class(hickory_proto::rr::DNSClass::IN);

    let mut message = Message::new(id, MessageType::Query, OpCode::Query);
    message.set_recursion_desired(true);
    message.add_query(query);

    encode(&message)
}
