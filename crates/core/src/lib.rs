//! Hashvault Core - Domain entities, services, and traits.
//!
//! This crate holds the account state model and the business workflows that
//! run on top of it. Account state is not stored in a local database: every
//! account owns an append-only ledger log and the latest message in that log
//! is the account's current snapshot.
//!
//! The crate is transport-agnostic. It defines traits for its collaborators
//! (identifier index, ledger network, brokerage) that are implemented by the
//! `storage-sqlite`, `ledger` and `brokerage` crates.
//!
//! ```text
//!   storage-sqlite      ledger        brokerage
//!         │               │               │
//!         └───────────────┼───────────────┘
//!                         ▼
//!                 core (this crate)
//!                         │
//!                         ▼
//!                   apps/server
//! ```

pub mod accounts;
pub mod brokerage;
pub mod constants;
pub mod errors;
pub mod ledger;
pub mod portfolio;
pub mod tokenization;

// Re-export error types
pub use errors::Error;
pub use errors::ErrorKind;
pub use errors::Result;
