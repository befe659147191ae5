use async_trait::async_trait;

use super::tokenization_model::{EligibleAsset, TokenizationReceipt, TokenizationSummary};
use crate::errors::Result;

/// Trait defining the contract for tokenization operations.
#[async_trait]
pub trait TokenizationServiceTrait: Send + Sync {
    /// Allow-listed symbols and their tokens.
    fn eligible_assets(&self) -> Vec<EligibleAsset>;

    /// Logo reference recorded for `symbol`.
    fn logo_for(&self, symbol: &str) -> String;

    /// Tokenizes the available quantity of one brokerage position for
    /// `account_id`: mint, record in the account snapshot, transfer.
    async fn tokenize_symbol(&self, account_id: &str, symbol: &str)
        -> Result<TokenizationReceipt>;

    /// Tokenizes every eligible brokerage position, one symbol after the
    /// other. Stops at the first failure.
    async fn tokenize_portfolio(&self, account_id: &str) -> Result<TokenizationSummary>;
}
