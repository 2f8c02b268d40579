//! DNS boundary: the [`DomainResolver`] trait, its trust-dns implementation
//! and the domain-existence stage (A with AAAA fallback).

mod domain;
mod error;
mod resolver;

pub use domain::{AddressFamily, DomainError, check_domain, domain_exists};
pub use error::DnsError;
pub use resolver::{DomainResolver, ResolverOptions, SystemResolver};

pub(crate) use resolver::{absolute_name, normalize_domain, normalize_exchange};
