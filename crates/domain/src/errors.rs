use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid record type: {0}")]
    InvalidRecordType(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid DNS message: {0}")]
    InvalidDnsMessage(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Rule store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Query timeout")]
    QueryTimeout,

    #[error("No upstream server available: {0}")]
    UpstreamUnavailable(String),

    #[error("Blocklist fetch failed: {0}")]
    BlocklistFetchError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("DNS server is already running")]
    ServerAlreadyRunning,

    #[error("DNS server is not running")]
    ServerNotRunning,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
