use thiserror::Error;

use crate::errors::ErrorKind;

/// Errors returned by ledger network adapters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The log has no messages yet, or the replica has not indexed the
    /// requested one.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Transient network or provider failure.
    #[error("Ledger unavailable: {0}")]
    Unavailable(String),

    /// The network refused a log append.
    #[error("Submission failed: {0}")]
    SubmissionFailed(String),

    /// The network refused a token operation.
    #[error("Rejected by network with status {status}")]
    RejectedByNetwork { status: String },

    /// The operator key could not sign or was not accepted.
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// The provider answered with something that could not be parsed.
    #[error("Invalid ledger response: {0}")]
    InvalidResponse(String),
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::NotFound(_) => ErrorKind::NotFound,
            LedgerError::Unavailable(_) => ErrorKind::Unavailable,
            LedgerError::SubmissionFailed(_) => ErrorKind::SubmissionFailed,
            LedgerError::RejectedByNetwork { .. } => ErrorKind::RejectedByNetwork,
            LedgerError::SigningFailed(_) => ErrorKind::SigningFailed,
            LedgerError::InvalidResponse(_) => ErrorKind::Unavailable,
        }
    }
}
