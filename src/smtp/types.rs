/// A raw SMTP reply, preserving the numeric status code and message text.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpReply {
    pub code: u16,
    pub message: String,
}

impl SmtpReply {
    pub fn is_positive_completion(&self) -> bool {
        (200..300).contains(&self.code)
    }

    /// 421: the server is shutting the transmission channel.
    pub fn is_closing(&self) -> bool {
        self.code == 421
    }

    /// 250 (local mailbox) or 251 (will forward).
    pub fn is_recipient_accepted(&self) -> bool {
        matches!(self.code, 250 | 251)
    }
}
