use super::{MxError, MxStatus};
use crate::dns::{DnsError, DomainResolver, normalize_domain};
use crate::report::CheckResult;

/// Hostnames listed in a successful verdict.
const LISTED_HOSTS: usize = 3;

/// Lookup MX records for `domain` through `resolver`.
///
/// The domain is normalized via IDNA before querying DNS. Records are sorted
/// by ascending preference (ties broken by exchange name) and deduplicated;
/// null MX entries (`.`) are dropped. A "no answer" response is
/// [`MxStatus::NoRecords`], not an error.
pub fn lookup_mx<R>(resolver: &R, domain: &str) -> Result<MxStatus, DnsError>
where
    R: DomainResolver + ?Sized,
{
    let ascii = normalize_domain(domain)?;
    match resolver.resolve_mx(&ascii) {
        Ok(answer) => Ok(MxStatus::from_answer(answer)),
        Err(DnsError::NoRecordsOfType) => Ok(MxStatus::NoRecords),
        Err(err) => Err(err),
    }
}

/// Mail-exchange hostnames for `domain`, most preferred first.
pub fn mx_hosts<R>(resolver: &R, domain: &str) -> Result<Vec<String>, MxError>
where
    R: DomainResolver + ?Sized,
{
    let hosts = lookup_mx(resolver, domain)?.into_exchanges();
    if hosts.is_empty() {
        Err(MxError::NoMxRecords)
    } else {
        Ok(hosts)
    }
}

pub fn check_mx_records<R>(resolver: &R, domain: &str) -> CheckResult
where
    R: DomainResolver + ?Sized,
{
    let result = match mx_hosts(resolver, domain) {
        Ok(hosts) => {
            let listed = hosts
                .iter()
                .take(LISTED_HOSTS)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            CheckResult::pass(format!("MX records found: {listed}"))
        }
        Err(err) => CheckResult::fail(err.to_string()),
    };
    tracing::debug!(domain, valid = result.valid, message = %result.message, "mx check");
    result
}
