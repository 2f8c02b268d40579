use std::fmt;

use thiserror::Error;

/// Adresse syntaxiquement valide, découpée sur le dernier `@`.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress {
    local: String,
    domain: String,
}

impl EmailAddress {
    pub(crate) fn new(local: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            local: local.into(),
            domain: domain.into(),
        }
    }

    pub fn local(&self) -> &str {
        &self.local
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.local, self.domain)
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("Email must be a non-empty string")]
    EmptyOrNonString,
    #[error("Invalid email format")]
    InvalidFormat,
    #[error("Local part (before @) is too long (max 64 chars)")]
    LocalPartTooLong,
    #[error("Domain part is too long (max 255 chars)")]
    DomainTooLong,
    #[error("Email contains consecutive dots")]
    ConsecutiveDots,
    #[error("Local part cannot start or end with a dot")]
    LeadingOrTrailingDot,
}
