use thiserror::Error;

/// Message fragment the ledger returns when the named ledger has no commits.
pub const LEDGER_MISSING_MARKER: &str = "no commit exists";

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("ledger {ledger} does not exist yet: {message}")]
    LedgerMissing { ledger: String, message: String },

    #[error("remote rejected request (status {status}): {message}")]
    Application { status: u16, message: String },

    #[error("malformed response: {0}")]
    Decode(String),
}

/// Coarse classification callers branch on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    LedgerMissing,
    Other,
}

impl RemoteError {
    /// Classify an error response from the ledger.
    ///
    /// This is the only place the message text is inspected.
    pub fn from_response(ledger: &str, status: u16, message: String) -> Self {
        if is_ledger_missing_message(&message) {
            Self::LedgerMissing {
                ledger: ledger.to_string(),
                message,
            }
        } else {
            Self::Application { status, message }
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::LedgerMissing { .. } => FailureKind::LedgerMissing,
            _ => FailureKind::Other,
        }
    }

    pub fn is_ledger_missing(&self) -> bool {
        self.kind() == FailureKind::LedgerMissing
    }
}

fn is_ledger_missing_message(message: &str) -> bool {
    message.to_ascii_lowercase().contains(LEDGER_MISSING_MARKER)
}

pub type RemoteResult<T> = Result<T, RemoteError>;
