#![forbid(unsafe_code)]
//! mailvet — vérification de délivrabilité d'une adresse e-mail
//! (syntaxe, domaine A/AAAA, MX, sonde SMTP RCPT optionnelle).

pub mod dns;
pub mod mx;
pub mod pipeline;
pub mod report;
pub mod smtp;
pub mod syntax;

pub use dns::{DnsError, DomainError, DomainResolver, ResolverOptions, SystemResolver};
pub use mx::{MxError, MxRecord, MxStatus};
pub use pipeline::{
    EmailValidator, ValidatorError, ValidatorOptions, validate, validate_with_options,
};
pub use report::{CheckResult, Checks, Stage, ValidationReport};
pub use smtp::{SmtpProbeError, SmtpProbeOptions, SmtpReply};
pub use syntax::{EmailAddress, SyntaxError, check_syntax, parse_email};
