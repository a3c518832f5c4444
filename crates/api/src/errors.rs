use axum::http::StatusCode;
use bastion_dns_domain::DomainError;
use tracing::error;

pub type ApiError = (StatusCode, String);

/// Maps a domain error to the HTTP status the admin API answers with.
pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::InvalidDomainName(_)
        | DomainError::InvalidIpAddress(_)
        | DomainError::InvalidRecordType(_)
        | DomainError::InvalidInput(_)
        | DomainError::InvalidDnsMessage(_)
        | DomainError::ConfigError(_) => StatusCode::BAD_REQUEST,
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Conflict(_)
        | DomainError::ServerAlreadyRunning
        | DomainError::ServerNotRunning => StatusCode::CONFLICT,
        DomainError::DatabaseError(_)
        | DomainError::StoreUnavailable(_)
        | DomainError::IoError(_)
        | DomainError::QueryTimeout
        | DomainError::UpstreamUnavailable(_)
        | DomainError::BlocklistFetchError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn api_error(error: DomainError, context: &'static str) -> ApiError {
    let status = status_for(&error);
    if status.is_server_error() {
        error!(error = %error, "{}", context);
    }
    (status, error.to_string())
}
