use rust_decimal::Decimal;
use thiserror::Error;

use super::tokenization_model::{SagaAction, SagaStep, TokenizationReceipt};
use crate::errors::Error;

/// Failure of a tokenization run after planning succeeded.
///
/// No compensation is attempted. The report says how far the failed symbol
/// got and which earlier symbols of the same run were fully tokenized, so an
/// operator can reconcile by hand.
#[derive(Error, Debug)]
#[error("Tokenization of {symbol} for account {account_id} failed during {failed_at} after reaching {reached}: {source}")]
pub struct SagaFailure {
    pub account_id: String,
    pub symbol: String,
    pub amount: Decimal,
    /// Last step completed for `symbol`.
    pub reached: SagaStep,
    pub failed_at: SagaAction,
    /// Supply was minted but never transferred to the account.
    pub orphaned_mint: bool,
    /// Symbols of the same run that reached `COMPLETE` before the failure.
    pub completed: Vec<TokenizationReceipt>,
    #[source]
    pub source: Box<Error>,
}

impl SagaFailure {
    pub fn new(
        account_id: &str,
        symbol: &str,
        amount: Decimal,
        failed_at: SagaAction,
        completed: Vec<TokenizationReceipt>,
        source: Error,
    ) -> Self {
        let reached = failed_at.reached();
        Self {
            account_id: account_id.to_string(),
            symbol: symbol.to_string(),
            amount,
            reached,
            failed_at,
            orphaned_mint: reached >= SagaStep::Minted,
            completed,
            source: Box::new(source),
        }
    }

    /// True when some external side effect was applied before the failure.
    pub fn is_partial(&self) -> bool {
        self.orphaned_mint || !self.completed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::ledger::LedgerError;
    use rust_decimal_macros::dec;

    fn failure(action: SagaAction, completed: Vec<TokenizationReceipt>) -> Error {
        SagaFailure::new(
            "0.0.100",
            "AAPL",
            dec!(12.5),
            action,
            completed,
            LedgerError::Unavailable("timeout".to_string()).into(),
        )
        .into()
    }

    #[test]
    fn test_mint_failure_keeps_source_kind() {
        let err = failure(SagaAction::Mint, vec![]);
        assert_eq!(err.kind(), ErrorKind::Unavailable);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_failure_after_mint_is_partial() {
        for action in [SagaAction::Record, SagaAction::Transfer] {
            let err = failure(action, vec![]);
            assert_eq!(err.kind(), ErrorKind::PartialFailure);
            match err {
                Error::Tokenization(f) => assert!(f.orphaned_mint),
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn test_mint_failure_after_completed_symbol_is_partial() {
        let receipt = TokenizationReceipt {
            symbol: "MSFT".to_string(),
            token_id: "0.0.7".to_string(),
            amount: dec!(1),
            mint_transaction_id: "0.0.1@1".to_string(),
            record_sequence_number: 2,
            transfer_transaction_id: "0.0.1@2".to_string(),
        };
        let err = failure(SagaAction::Mint, vec![receipt]);
        assert_eq!(err.kind(), ErrorKind::PartialFailure);
        assert!(err.to_string().contains("after reaching ELIGIBLE"));
    }
}
