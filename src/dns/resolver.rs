use std::io;
use std::time::Duration;

use trust_dns_resolver::proto::rr::{Name, RecordType};
use trust_dns_resolver::{Resolver, system_conf::read_system_conf};

use super::DnsError;
use crate::mx::MxRecord;

/// Knobs applied on top of the system resolver configuration.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "with-serde", serde(default))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverOptions {
    pub timeout_ms: u64,
    pub attempts: usize,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 5_000,
            attempts: 2,
        }
    }
}

impl ResolverOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.max(1))
    }
}

/// DNS capability the validation stages depend on.
///
/// Implementations receive ASCII (IDNA-normalised) domain names.
pub trait DomainResolver {
    /// `true` if at least one A record exists.
    fn resolve_a(&self, domain: &str) -> Result<bool, DnsError>;
    /// `true` if at least one AAAA record exists.
    fn resolve_aaaa(&self, domain: &str) -> Result<bool, DnsError>;
    /// MX records in the order the server returned them.
    fn resolve_mx(&self, domain: &str) -> Result<Vec<MxRecord>, DnsError>;
}

/// [`DomainResolver`] backed by the synchronous trust-dns resolver and the
/// host's `/etc/resolv.conf`.
pub struct SystemResolver {
    inner: Resolver,
}

impl SystemResolver {
    pub fn from_system_conf() -> io::Result<Self> {
        Self::with_options(&ResolverOptions::default())
    }

    pub fn with_options(options: &ResolverOptions) -> io::Result<Self> {
        let (config, mut opts) = read_system_conf()?;
        opts.timeout = options.timeout();
        opts.attempts = options.attempts.max(1);
        let inner = Resolver::new(config, opts)?;
        Ok(Self { inner })
    }

    fn has_records(&self, domain: &str, record_type: RecordType) -> Result<bool, DnsError> {
        let lookup = self.inner.lookup(absolute_name(domain)?, record_type)?;
        Ok(lookup
            .iter()
            .any(|rdata| rdata.record_type() == record_type))
    }
}

impl DomainResolver for SystemResolver {
    fn resolve_a(&self, domain: &str) -> Result<bool, DnsError> {
        self.has_records(domain, RecordType::A)
    }

    fn resolve_aaaa(&self, domain: &str) -> Result<bool, DnsError> {
        self.has_records(domain, RecordType::AAAA)
    }

    fn resolve_mx(&self, domain: &str) -> Result<Vec<MxRecord>, DnsError> {
        let lookup = self.inner.mx_lookup(absolute_name(domain)?)?;
        Ok(lookup
            .iter()
            .map(|mx| MxRecord::new(mx.preference(), normalize_exchange(&mx.exchange().to_utf8())))
            .collect())
    }
}

/// Trim, drop the root dot and convert to ASCII (punycode) form.
pub(crate) fn normalize_domain(domain: &str) -> Result<String, DnsError> {
    let trimmed = domain.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        return Err(DnsError::invalid_name(domain, "domain is empty"));
    }
    idna::domain_to_ascii(trimmed).map_err(|err| DnsError::invalid_name(trimmed, err))
}

/// Fully-qualified query name, so the `search`/`ndots` list of
/// `/etc/resolv.conf` is never appended.
pub(crate) fn absolute_name(domain: &str) -> Result<Name, DnsError> {
    let mut name = Name::from_ascii(domain).map_err(|err| DnsError::invalid_name(domain, err))?;
    name.set_fqdn(true);
    Ok(name)
}

pub(crate) fn normalize_exchange(exchange: &str) -> String {
    exchange.trim_end_matches('.').to_ascii_lowercase()
}
