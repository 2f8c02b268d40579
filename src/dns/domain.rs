use thiserror::Error;

use super::{DnsError, DomainResolver, resolver::normalize_domain};
use crate::report::CheckResult;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Domain does not exist")]
    DomainNotFound,
    #[error("No nameservers found for domain")]
    NoNameservers,
    #[error("DNS query timed out")]
    Timeout,
    #[error("Domain has no A or AAAA records")]
    NoRecordsOfType,
    #[error("DNS error: {0}")]
    OtherResolutionError(String),
}

impl From<DnsError> for DomainError {
    fn from(err: DnsError) -> Self {
        match err {
            DnsError::DomainNotFound => Self::DomainNotFound,
            DnsError::NoNameservers => Self::NoNameservers,
            DnsError::Timeout => Self::Timeout,
            DnsError::NoRecordsOfType => Self::NoRecordsOfType,
            other => Self::OtherResolutionError(other.to_string()),
        }
    }
}

/// Which record type proved the domain exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
}

/// A lookup first; AAAA only when the name exists without any A record.
pub fn domain_exists<R>(resolver: &R, domain: &str) -> Result<AddressFamily, DomainError>
where
    R: DomainResolver + ?Sized,
{
    let ascii = normalize_domain(domain)?;
    match resolver.resolve_a(&ascii) {
        Ok(true) => Ok(AddressFamily::Ipv4),
        Ok(false) | Err(DnsError::NoRecordsOfType) => match resolver.resolve_aaaa(&ascii) {
            Ok(true) => Ok(AddressFamily::Ipv6),
            _ => Err(DomainError::NoRecordsOfType),
        },
        Err(err) => Err(err.into()),
    }
}

pub fn check_domain<R>(resolver: &R, domain: &str) -> CheckResult
where
    R: DomainResolver + ?Sized,
{
    let result = match domain_exists(resolver, domain) {
        Ok(AddressFamily::Ipv4) => CheckResult::pass("Domain exists"),
        Ok(AddressFamily::Ipv6) => CheckResult::pass("Domain exists (IPv6)"),
        Err(err) => CheckResult::fail(err.to_string()),
    };
    tracing::debug!(domain, valid = result.valid, message = %result.message, "domain check");
    result
}
