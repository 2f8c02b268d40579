//! Live mailbox probing: a partial SMTP transaction (banner, HELO, MAIL FROM,
//! RCPT TO, QUIT) against the most preferred MX host. No message is sent.
//!
//! The public entry points are [`check_smtp`], which folds the outcome into a
//! [`CheckResult`](crate::CheckResult), and [`probe_mailbox`], which keeps the
//! typed [`SmtpProbeError`].

mod error;
mod options;
mod probe;
mod session;
mod types;

pub use error::SmtpProbeError;
pub use options::{DEFAULT_HELO, DEFAULT_MAIL_FROM, SmtpProbeOptions};
pub use probe::{check_smtp, probe_mailbox};
pub use types::SmtpReply;
