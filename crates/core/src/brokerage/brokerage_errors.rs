use thiserror::Error;

use crate::errors::ErrorKind;

/// Errors returned by brokerage adapters.
///
/// Each variant maps to an [`ErrorKind`] via [`kind`](Self::kind).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BrokerageError {
    /// Network failure, timeout, rate limit or 5xx from the provider.
    /// The caller may retry.
    #[error("Brokerage unavailable: {0}")]
    Unavailable(String),

    /// Credentials were missing or rejected (401/403).
    #[error("Brokerage authentication failed: {0}")]
    AuthError(String),

    /// The requested position or resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The provider answered with a body that could not be parsed.
    #[error("Invalid brokerage response: {0}")]
    InvalidResponse(String),
}

impl BrokerageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BrokerageError::Unavailable(_) => ErrorKind::Unavailable,
            BrokerageError::AuthError(_) => ErrorKind::AuthError,
            BrokerageError::NotFound(_) => ErrorKind::NotFound,
            BrokerageError::InvalidResponse(_) => ErrorKind::Unavailable,
        }
    }
}
