use thiserror::Error;

use crate::dns::DnsError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MxError {
    #[error("Domain does not exist")]
    DomainNotFound,
    #[error("No MX records found")]
    NoMxRecords,
    #[error("MX lookup error: {0}")]
    MxLookupError(String),
}

impl From<DnsError> for MxError {
    fn from(err: DnsError) -> Self {
        match err {
            DnsError::DomainNotFound => Self::DomainNotFound,
            DnsError::NoRecordsOfType => Self::NoMxRecords,
            other => Self::MxLookupError(other.to_string()),
        }
    }
}
