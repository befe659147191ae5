//! SQLite storage implementation for Hashvault.
//!
//! Account state lives in ledger logs; the only thing stored locally is the
//! identifier index mapping an account id to its log id. This crate holds
//! everything Diesel related:
//! - Database connection pooling and the single writer actor
//! - Embedded migrations
//! - The [`AccountIndexRepository`](account_index::AccountIndexRepository)
//!
//! ```text
//!          core (traits)
//!               │
//!               ▼
//!   storage-sqlite (this crate)
//!               │
//!               ▼
//!           SQLite DB
//! ```

pub mod account_index;
pub mod db;
pub mod errors;
pub mod schema;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from hashvault-core for convenience
pub use hashvault_core::errors::{DatabaseError, Error, Result};
