//! Ledger network adapter for Hashvault.
//!
//! Implements the core's [`LedgerLogTrait`](hashvault_core::ledger::LedgerLogTrait)
//! and [`TokenLedgerTrait`](hashvault_core::ledger::TokenLedgerTrait) over two
//! HTTP services:
//!
//! - the **consensus gateway**, which accepts operator-signed submissions
//!   (log appends, token mints and transfers) and reports a log's current
//!   sequence number;
//! - the **mirror node**, an eventually-consistent read replica serving
//!   individual log messages.
//!
//! Because reads and writes go to different services, a message appended a
//! moment ago may not be readable yet.

mod client;
mod config;
mod gateway;
mod http;
mod mirror;
mod signer;

pub use client::LedgerClient;
pub use config::{
    LedgerClientConfig, DEFAULT_MIRROR_NODE_URL, DEFAULT_READ_TIMEOUT_SECS,
    DEFAULT_SUBMIT_TIMEOUT_SECS,
};
pub use signer::OperatorSigner;
