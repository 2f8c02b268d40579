use thiserror::Error;
use trust_dns_resolver::error::{ResolveError, ResolveErrorKind};
use trust_dns_resolver::proto::{error::ProtoErrorKind, op::ResponseCode};

/// Failure taxonomy surfaced by a [`DomainResolver`](super::DomainResolver).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DnsError {
    #[error("domain does not exist (NXDOMAIN)")]
    DomainNotFound,
    #[error("no nameserver could answer the query")]
    NoNameservers,
    #[error("DNS query timed out")]
    Timeout,
    #[error("no records of the requested type")]
    NoRecordsOfType,
    #[error("invalid domain name '{domain}': {reason}")]
    InvalidName { domain: String, reason: String },
    #[error("{0}")]
    Other(String),
}

impl DnsError {
    pub(crate) fn invalid_name(domain: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidName {
            domain: domain.into(),
            reason: reason.to_string(),
        }
    }

    /// Classify an empty answer by the response code the server sent with it.
    pub(crate) fn from_response_code(code: ResponseCode) -> Self {
        match code {
            ResponseCode::NXDomain => Self::DomainNotFound,
            ResponseCode::ServFail | ResponseCode::Refused => Self::NoNameservers,
            _ => Self::NoRecordsOfType,
        }
    }
}

impl From<ResolveError> for DnsError {
    fn from(err: ResolveError) -> Self {
        match err.kind() {
            ResolveErrorKind::NoRecordsFound { response_code, .. } => {
                Self::from_response_code(*response_code)
            }
            ResolveErrorKind::NoConnections => Self::NoNameservers,
            ResolveErrorKind::Timeout => Self::Timeout,
            ResolveErrorKind::Proto(proto) if matches!(proto.kind(), ProtoErrorKind::Timeout) => {
                Self::Timeout
            }
            ResolveErrorKind::Io(io) if io.kind() == std::io::ErrorKind::TimedOut => Self::Timeout,
            _ => Self::Other(err.to_string()),
        }
    }
}
