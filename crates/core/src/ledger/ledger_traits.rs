use async_trait::async_trait;

use super::ledger_model::{LedgerMessage, LedgerReceipt, TokenAmount};
use crate::errors::Result;

/// Append-only, sequence-numbered message log (one per account).
#[async_trait]
pub trait LedgerLogTrait: Send + Sync {
    /// Submits `payload` as a new immutable message and returns the sequence
    /// number the network assigned to it.
    async fn append(&self, log_id: &str, memo: &str, payload: Vec<u8>) -> Result<u64>;

    /// Returns the message at the log's current highest sequence number.
    ///
    /// The sequence number and the message are read from different replicas;
    /// an append that just completed may not be visible yet.
    async fn fetch_latest(&self, log_id: &str) -> Result<LedgerMessage>;
}

/// Issuer-only token primitives.
#[async_trait]
pub trait TokenLedgerTrait: Send + Sync {
    /// Creates `amount` of new supply in the issuer's treasury.
    async fn mint_supply(&self, token_id: &str, amount: TokenAmount) -> Result<LedgerReceipt>;

    /// Moves `amount` from the issuer's treasury to `to_account`.
    async fn transfer(
        &self,
        token_id: &str,
        to_account: &str,
        amount: TokenAmount,
    ) -> Result<LedgerReceipt>;
}
