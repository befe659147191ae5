//! Core error types for Hashvault.
//!
//! This module defines transport-agnostic error types. Storage, ledger and
//! brokerage specific failures are converted into these types by the adapter
//! crates before they reach the services.

use thiserror::Error;

use crate::brokerage::BrokerageError;
use crate::ledger::LedgerError;
use crate::tokenization::SagaFailure;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for Hashvault.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Ledger operation failed: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Brokerage operation failed: {0}")]
    Brokerage(#[from] BrokerageError),

    #[error("Stored account state is unreadable: {0}")]
    Codec(#[from] CodecError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Account {0} is not registered")]
    UnregisteredAccount(String),

    /// The index entry was written but the initial snapshot never reached
    /// the ledger log. The account resolves to a log with no state.
    #[error("Registration of {account_id} is incomplete: indexed to log {log_id} but the initial snapshot was not appended: {source}")]
    RegistrationIncomplete {
        account_id: String,
        log_id: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Asset is not eligible for tokenization: {0}")]
    IneligibleAsset(String),

    #[error(transparent)]
    Tokenization(#[from] SagaFailure),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Coarse classification of an [`Error`], used by callers to pick a response
/// status and a retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    /// Transient network or provider failure. Safe to retry with backoff.
    Unavailable,
    SubmissionFailed,
    RejectedByNetwork,
    SigningFailed,
    AuthError,
    MalformedPayload,
    IneligibleAsset,
    Validation,
    /// Some external side effects were applied before the failure.
    PartialFailure,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::AlreadyExists => "ALREADY_EXISTS",
            ErrorKind::Unavailable => "UNAVAILABLE",
            ErrorKind::SubmissionFailed => "SUBMISSION_FAILED",
            ErrorKind::RejectedByNetwork => "REJECTED_BY_NETWORK",
            ErrorKind::SigningFailed => "SIGNING_FAILED",
            ErrorKind::AuthError => "AUTH_ERROR",
            ErrorKind::MalformedPayload => "MALFORMED_PAYLOAD",
            ErrorKind::IneligibleAsset => "INELIGIBLE_ASSET",
            ErrorKind::Validation => "VALIDATION",
            ErrorKind::PartialFailure => "PARTIAL_FAILURE",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

impl Error {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Database(DatabaseError::NotFound(_)) => ErrorKind::NotFound,
            Error::Database(DatabaseError::UniqueViolation(_)) => ErrorKind::AlreadyExists,
            Error::Database(_) => ErrorKind::Internal,
            Error::Ledger(e) => e.kind(),
            Error::Brokerage(e) => e.kind(),
            Error::Codec(_) => ErrorKind::MalformedPayload,
            Error::Validation(_) => ErrorKind::Validation,
            Error::UnregisteredAccount(_) => ErrorKind::NotFound,
            Error::RegistrationIncomplete { .. } => ErrorKind::PartialFailure,
            Error::IneligibleAsset(_) => ErrorKind::IneligibleAsset,
            Error::Tokenization(failure) => {
                if failure.is_partial() {
                    ErrorKind::PartialFailure
                } else {
                    failure.source.kind()
                }
            }
            Error::Unexpected(_) => ErrorKind::Internal,
        }
    }

    /// True when the failure is transient and the caller may retry.
    ///
    /// Nothing inside the core retries on its own.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Unavailable
    }
}

/// Storage-agnostic error type for the identifier index.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    #[error("Database query failed: {0}")]
    QueryFailed(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Errors raised while turning a ledger message back into account state.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
}

/// Validation errors for user input.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid ledger identifier '{0}': expected <shard>.<realm>.<num>")]
    InvalidLedgerId(String),

    #[error("Amount {amount} cannot be expressed with {decimals} decimals")]
    UnrepresentableAmount { amount: String, decimals: u32 },
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        CodecError::MalformedPayload(err.to_string())
    }
}
