use std::time::Duration;

pub const DEFAULT_HELO: &str = "localhost";
pub const DEFAULT_MAIL_FROM: &str = "test@example.com";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const MAX_TIMEOUT_MS: u64 = 300_000;

/// Configuration knobs for [`check_smtp`](super::check_smtp).
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "with-serde", serde(default))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpProbeOptions {
    pub port: u16,
    pub timeout_ms: u64,
    pub helo_domain: String,
    pub mail_from: String,
}

impl Default for SmtpProbeOptions {
    fn default() -> Self {
        Self {
            port: 25,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            helo_domain: String::new(),
            mail_from: String::new(),
        }
    }
}

impl SmtpProbeOptions {
    /// Budget for the whole socket lifetime, connect to close. Zero means the
    /// default; anything above five minutes is clamped.
    pub fn timeout(&self) -> Duration {
        let ms = match self.timeout_ms {
            0 => DEFAULT_TIMEOUT_MS,
            ms => ms.min(MAX_TIMEOUT_MS),
        };
        Duration::from_millis(ms)
    }

    pub fn helo_name(&self) -> &str {
        let trimmed = self.helo_domain.trim();
        if trimmed.is_empty() {
            DEFAULT_HELO
        } else {
            trimmed
        }
    }

    pub fn mail_from(&self) -> &str {
        if self.mail_from.is_empty() {
            DEFAULT_MAIL_FROM
        } else {
            &self.mail_from
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallbacks() {
        let options = SmtpProbeOptions::default();
        assert_eq!(options.helo_name(), "localhost");
        assert_eq!(options.mail_from(), "test@example.com");
        assert_eq!(options.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn deadline_is_always_bounded() {
        let options = SmtpProbeOptions {
            timeout_ms: 0,
            helo_domain: "  probe.example.net ".into(),
            ..SmtpProbeOptions::default()
        };
        assert_eq!(options.timeout(), Duration::from_secs(10));
        assert_eq!(options.helo_name(), "probe.example.net");

        let huge = SmtpProbeOptions {
            timeout_ms: u64::MAX,
            ..SmtpProbeOptions::default()
        };
        assert_eq!(huge.timeout(), Duration::from_secs(300));
    }
}
