use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::{Duration, Instant};

use super::SmtpReply;
use super::error::SmtpProbeError;

/// Twice the 512 octets RFC 5321 allows per reply line.
const MAX_REPLY_LINE: u64 = 1024;
const MAX_REPLY_LINES: usize = 64;

/// An open SMTP connection bounded by a single deadline.
///
/// Dropping the session sends a best-effort `QUIT` (if budget remains) and
/// shuts the socket down, whichever path the dialogue left by.
pub(crate) struct SmtpSession {
    host: String,
    stream: TcpStream,
    reader: BufReader<TcpStream>,
    deadline: Instant,
    open: bool,
}

impl SmtpSession {
    pub(crate) fn connect(
        host: &str,
        addrs: &[SocketAddr],
        timeout: Duration,
    ) -> Result<Self, SmtpProbeError> {
        let deadline = Instant::now() + timeout;
        let mut last_err = None;
        for addr in addrs {
            let attempt = match remaining(deadline) {
                Ok(left) => TcpStream::connect_timeout(addr, left),
                Err(err) => {
                    last_err = Some(err);
                    break;
                }
            };
            match attempt {
                Ok(stream) => {
                    let reader = stream
                        .try_clone()
                        .map(BufReader::new)
                        .map_err(|err| SmtpProbeError::connect(host, err))?;
                    tracing::debug!(host, %addr, "SMTP connection established");
                    return Ok(Self {
                        host: host.to_string(),
                        stream,
                        reader,
                        deadline,
                        open: true,
                    });
                }
                Err(err) => {
                    tracing::debug!(host, %addr, error = %err, "SMTP connect attempt failed");
                    last_err = Some(err);
                }
            }
        }
        Err(SmtpProbeError::connect(
            host,
            last_err.unwrap_or_else(|| {
                io::Error::new(
                    io::ErrorKind::AddrNotAvailable,
                    "no socket address available",
                )
            }),
        ))
    }

    /// Re-arm the socket timeouts with whatever is left of the budget.
    fn arm(&self) -> io::Result<()> {
        let left = remaining(self.deadline)?;
        self.stream.set_read_timeout(Some(left))?;
        self.stream.set_write_timeout(Some(left))?;
        Ok(())
    }

    pub(crate) fn send_command(&mut self, command: &str) -> io::Result<()> {
        tracing::trace!(host = %self.host, "C: {command}");
        self.arm()?;
        let mut line = command.as_bytes().to_vec();
        line.extend_from_slice(b"\r\n");
        self.stream.write_all(&line)?;
        self.stream.flush()
    }

    pub(crate) fn read_reply(&mut self) -> io::Result<SmtpReply> {
        let mut code = None;
        let mut message_lines = Vec::new();
        loop {
            self.arm()?;
            if message_lines.len() >= MAX_REPLY_LINES {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("SMTP reply exceeds {MAX_REPLY_LINES} lines"),
                ));
            }
            let mut raw = String::new();
            let bytes = (&mut self.reader).take(MAX_REPLY_LINE).read_line(&mut raw)?;
            if bytes == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed while reading reply",
                ));
            }
            if bytes as u64 == MAX_REPLY_LINE && !raw.ends_with('\n') {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("SMTP reply line exceeds {MAX_REPLY_LINE} bytes"),
                ));
            }
            if raw.ends_with('\n') {
                raw.pop();
                if raw.ends_with('\r') {
                    raw.pop();
                }
            }
            tracing::trace!(host = %self.host, "S: {raw}");

            if raw.len() < 3 || !raw.is_char_boundary(3) {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("invalid SMTP reply: '{raw}'"),
                ));
            }
            let code_part = &raw[..3];
            let parsed_code = code_part.parse::<u16>().map_err(|_| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("invalid SMTP status code: '{code_part}'"),
                )
            })?;
            match code {
                Some(existing) if existing != parsed_code => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("inconsistent SMTP reply codes: {existing} vs {parsed_code}"),
                    ));
                }
                Some(_) => {}
                None => code = Some(parsed_code),
            }
            let continuation = raw.as_bytes().get(3).copied() == Some(b'-');
            let text = raw.get(4..).unwrap_or_default().to_string();
            message_lines.push(text);
            if !continuation {
                break;
            }
        }
        Ok(SmtpReply {
            code: code.ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidData, "SMTP reply missing status code")
            })?,
            message: message_lines.join("\n"),
        })
    }

    pub(crate) fn command(&mut self, command: &str) -> io::Result<SmtpReply> {
        self.send_command(command)?;
        self.read_reply()
    }

    /// Graceful close. Errors are ignored: the server may already be gone.
    pub(crate) fn quit(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        match self.command("QUIT") {
            Ok(reply) => tracing::trace!(host = %self.host, code = reply.code, "QUIT acknowledged"),
            Err(err) => tracing::trace!(host = %self.host, error = %err, "QUIT not acknowledged"),
        }
        self.stream.shutdown(Shutdown::Both).ok();
    }
}

impl Drop for SmtpSession {
    fn drop(&mut self) {
        self.quit();
    }
}

/// `Err(TimedOut)` once the deadline has passed.
fn remaining(deadline: Instant) -> io::Result<Duration> {
    let left = deadline.saturating_duration_since(Instant::now());
    if left.is_zero() {
        Err(io::Error::new(io::ErrorKind::TimedOut, "SMTP deadline exceeded"))
    } else {
        Ok(left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_budget() {
        let later = Instant::now() + Duration::from_secs(60);
        assert!(remaining(later).unwrap() > Duration::from_secs(50));
        let past = Instant::now() - Duration::from_millis(1);
        let err = remaining(past).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
    }

    #[test]
    fn connect_without_addresses_fails() {
        let err = SmtpSession::connect("mx.example.com", &[], Duration::from_secs(1))
            .err()
            .expect("no address to try");
        assert!(matches!(err, SmtpProbeError::ConnectError { ref host, .. } if host == "mx.example.com"));
    }
}
