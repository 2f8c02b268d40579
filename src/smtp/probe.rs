use std::io;
use std::net::{SocketAddr, ToSocketAddrs};

use super::error::SmtpProbeError;
use super::options::SmtpProbeOptions;
use super::session::SmtpSession;
use super::types::SmtpReply;
use crate::dns::DomainResolver;
use crate::mx::{MxError, mx_hosts};
use crate::report::CheckResult;
use crate::syntax::EmailAddress;

/// Ask the first MX host of `email`'s domain whether it would accept mail
/// for `email`. Returns the accepting `RCPT TO` reply (250 or 251).
///
/// Exactly one connection attempt is made; the socket is closed before this
/// function returns, on every path.
pub fn probe_mailbox<R>(
    resolver: &R,
    email: &EmailAddress,
    options: &SmtpProbeOptions,
) -> Result<SmtpReply, SmtpProbeError>
where
    R: DomainResolver + ?Sized,
{
    let host = first_exchange(resolver, email.domain())?;
    let addrs =
        resolve_socket_addrs(&host, options.port).map_err(|err| SmtpProbeError::connect(&host, err))?;
    let mut session = SmtpSession::connect(&host, &addrs, options.timeout())?;
    let outcome = converse(&mut session, email, options);
    session.quit();
    outcome
}

pub fn check_smtp<R>(resolver: &R, email: &EmailAddress, options: &SmtpProbeOptions) -> CheckResult
where
    R: DomainResolver + ?Sized,
{
    match probe_mailbox(resolver, email, options) {
        Ok(reply) => {
            tracing::debug!(%email, code = reply.code, "SMTP probe accepted");
            CheckResult::pass(format!("SMTP verification passed (code {})", reply.code))
        }
        Err(err) => {
            tracing::debug!(%email, error = %err, "SMTP probe failed");
            CheckResult::fail(err.to_string())
        }
    }
}

fn first_exchange<R>(resolver: &R, domain: &str) -> Result<String, SmtpProbeError>
where
    R: DomainResolver + ?Sized,
{
    match mx_hosts(resolver, domain) {
        Ok(hosts) => hosts.into_iter().next().ok_or(SmtpProbeError::NoMxRecords),
        Err(MxError::NoMxRecords | MxError::DomainNotFound) => Err(SmtpProbeError::NoMxRecords),
        Err(MxError::MxLookupError(detail)) => Err(SmtpProbeError::SmtpUnavailable(detail)),
    }
}

fn resolve_socket_addrs(exchange: &str, port: u16) -> io::Result<Vec<SocketAddr>> {
    (exchange, port).to_socket_addrs().map(|iter| iter.collect())
}

fn converse(
    session: &mut SmtpSession,
    email: &EmailAddress,
    options: &SmtpProbeOptions,
) -> Result<SmtpReply, SmtpProbeError> {
    let banner = session.read_reply().map_err(SmtpProbeError::from_io)?;
    expect_positive(banner, |code, message| SmtpProbeError::GreetRejected { code, message })?;

    let helo = session
        .command(&format!("HELO {}", options.helo_name()))
        .map_err(SmtpProbeError::from_io)?;
    expect_positive(helo, |code, message| SmtpProbeError::GreetRejected { code, message })?;

    let mail = session
        .command(&format!("MAIL FROM:<{}>", options.mail_from()))
        .map_err(SmtpProbeError::from_io)?;
    expect_positive(mail, |code, message| SmtpProbeError::MailFromRejected { code, message })?;

    let rcpt = session
        .command(&format!("RCPT TO:<{email}>"))
        .map_err(SmtpProbeError::from_io)?;
    if rcpt.is_closing() {
        return Err(SmtpProbeError::ServerDisconnected);
    }
    if rcpt.is_recipient_accepted() {
        Ok(rcpt)
    } else {
        Err(SmtpProbeError::SmtpRejected {
            code: rcpt.code,
            message: rcpt.message,
        })
    }
}

fn expect_positive<F>(reply: SmtpReply, rejected: F) -> Result<SmtpReply, SmtpProbeError>
where
    F: FnOnce(u16, String) -> SmtpProbeError,
{
    if reply.is_closing() {
        Err(SmtpProbeError::ServerDisconnected)
    } else if reply.is_positive_completion() {
        Ok(reply)
    } else {
        Err(rejected(reply.code, reply.message))
    }
}
