use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SmtpProbeError {
    #[error("No MX records available for SMTP probe")]
    NoMxRecords,
    #[error("Could not connect to {host}: {source}")]
    ConnectError {
        host: String,
        #[source]
        source: io::Error,
    },
    #[error("SMTP greeting rejected (code {code}): {message}")]
    GreetRejected { code: u16, message: String },
    #[error("MAIL FROM rejected (code {code}): {message}")]
    MailFromRejected { code: u16, message: String },
    #[error("SMTP verification failed (code {code}): {message}")]
    SmtpRejected { code: u16, message: String },
    #[error("SMTP server disconnected")]
    ServerDisconnected,
    #[error("SMTP verification unavailable: {0}")]
    SmtpUnavailable(String),
}

impl SmtpProbeError {
    pub(crate) fn connect(host: impl Into<String>, source: io::Error) -> Self {
        Self::ConnectError {
            host: host.into(),
            source,
        }
    }

    /// Classify a transport failure seen after the connection was established.
    pub(crate) fn from_io(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe => Self::ServerDisconnected,
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => {
                Self::SmtpUnavailable("timed out".to_string())
            }
            _ => Self::SmtpUnavailable(err.to_string()),
        }
    }
}
