//! Syntactic checks on an address string. Pure, no I/O.

mod local;
mod types;

pub use types::{EmailAddress, SyntaxError};

use std::sync::LazyLock;

use regex::Regex;

use crate::report::CheckResult;
use local::{has_consecutive_dots, has_edge_dot};

pub const MAX_LOCAL_LEN: usize = 64;
pub const MAX_DOMAIN_LEN: usize = 255;

pub(crate) const SYNTAX_OK: &str = "Syntax is valid";

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern compiles")
});

/// Parse `email` into an [`EmailAddress`], rejecting it on the first rule it
/// breaks. Surrounding whitespace is ignored.
pub fn parse_email(email: &str) -> Result<EmailAddress, SyntaxError> {
    if email.is_empty() {
        return Err(SyntaxError::EmptyOrNonString);
    }
    let input = email.trim();

    if !EMAIL_PATTERN.is_match(input) {
        return Err(SyntaxError::InvalidFormat);
    }

    let (local, domain) = input.rsplit_once('@').ok_or(SyntaxError::InvalidFormat)?;

    if local.len() > MAX_LOCAL_LEN {
        return Err(SyntaxError::LocalPartTooLong);
    }
    if domain.len() > MAX_DOMAIN_LEN {
        return Err(SyntaxError::DomainTooLong);
    }
    if has_consecutive_dots(input) {
        return Err(SyntaxError::ConsecutiveDots);
    }
    if has_edge_dot(local) {
        return Err(SyntaxError::LeadingOrTrailingDot);
    }

    Ok(EmailAddress::new(local, domain))
}

pub fn check_syntax(email: &str) -> CheckResult {
    match parse_email(email) {
        Ok(_) => CheckResult::pass(SYNTAX_OK),
        Err(err) => CheckResult::fail(err.to_string()),
    }
}
