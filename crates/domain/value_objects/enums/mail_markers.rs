use std::fmt::Display;

/// Marks which reminder mail has already gone out for an order. Independent of the
/// payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailMarker {
    PendingSent,
    /// The sweep gave up on this order. Only a manual check retries it.
    PendingFailed,
}

impl MailMarker {
    pub fn as_str(&self) -> &'static str {
        match self {
            MailMarker::PendingSent => "PENDING_SENT",
            MailMarker::PendingFailed => "PENDING_FAILED",
        }
    }
}

impl Display for MailMarker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
