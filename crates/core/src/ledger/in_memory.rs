//! Process-local ledger used by tests and local development.
//!
//! Models the behaviors the services have to cope with on the real network:
//! a lagging read replica (`set_read_lag`) and per-operation failures
//! (`fail_next`, `fail_always`). Token balances are tracked so a mint that
//! never reaches its owner can be observed.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use log::debug;
use rust_decimal::Decimal;

use super::ledger_errors::LedgerError;
use super::ledger_model::{LedgerMessage, LedgerReceipt, TokenAmount};
use super::ledger_traits::{LedgerLogTrait, TokenLedgerTrait};
use crate::constants::RECEIPT_STATUS_SUCCESS;
use crate::errors::Result;

/// Ledger operation, used to target injected failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerOp {
    Append,
    FetchLatest,
    Mint,
    Transfer,
}

#[derive(Debug, Clone)]
struct StoredMessage {
    memo: String,
    payload: Vec<u8>,
}

#[derive(Default)]
struct LedgerState {
    logs: HashMap<String, Vec<StoredMessage>>,
    read_lag: usize,
    /// `None` entries let one call through.
    queued_failures: HashMap<LedgerOp, VecDeque<Option<LedgerError>>>,
    sticky_failures: HashMap<LedgerOp, LedgerError>,
    treasury: HashMap<String, Decimal>,
    balances: HashMap<(String, String), Decimal>,
    mints: Vec<(String, TokenAmount)>,
    next_tx: u64,
}

impl LedgerState {
    fn take_failure(&mut self, op: LedgerOp) -> Option<LedgerError> {
        if let Some(queued) = self
            .queued_failures
            .get_mut(&op)
            .and_then(|queue| queue.pop_front())
        {
            return queued;
        }
        self.sticky_failures.get(&op).cloned()
    }

    fn next_transaction_id(&mut self, issuer: &str) -> String {
        self.next_tx += 1;
        format!("{}@{}", issuer, self.next_tx)
    }
}

/// In-memory implementation of [`LedgerLogTrait`] and [`TokenLedgerTrait`].
pub struct InMemoryLedger {
    issuer_account: String,
    state: Mutex<LedgerState>,
}

impl InMemoryLedger {
    /// Creates an empty ledger whose token operations act on behalf of
    /// `issuer_account`.
    pub fn new(issuer_account: impl Into<String>) -> Self {
        Self {
            issuer_account: issuer_account.into(),
            state: Mutex::new(LedgerState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Makes `fetch_latest` trail the newest message by `lag` messages.
    pub fn set_read_lag(&self, lag: usize) {
        self.state().read_lag = lag;
    }

    /// Fails the next call of `op` with `err`. Calls queue up in order.
    pub fn fail_next(&self, op: LedgerOp, err: LedgerError) {
        self.state()
            .queued_failures
            .entry(op)
            .or_default()
            .push_back(Some(err));
    }

    /// Lets the next call of `op` through; queue it before `fail_next` to
    /// fail a later call.
    pub fn pass_next(&self, op: LedgerOp) {
        self.state()
            .queued_failures
            .entry(op)
            .or_default()
            .push_back(None);
    }

    /// Fails every call of `op` with `err` until [`clear_failures`](Self::clear_failures).
    pub fn fail_always(&self, op: LedgerOp, err: LedgerError) {
        self.state().sticky_failures.insert(op, err);
    }

    pub fn clear_failures(&self) {
        let mut state = self.state();
        state.queued_failures.clear();
        state.sticky_failures.clear();
    }

    /// All payloads ever appended to `log_id`, oldest first.
    pub fn messages(&self, log_id: &str) -> Vec<Vec<u8>> {
        self.state()
            .logs
            .get(log_id)
            .map(|log| log.iter().map(|m| m.payload.clone()).collect())
            .unwrap_or_default()
    }

    /// Memos of all messages appended to `log_id`, oldest first.
    pub fn memos(&self, log_id: &str) -> Vec<String> {
        self.state()
            .logs
            .get(log_id)
            .map(|log| log.iter().map(|m| m.memo.clone()).collect())
            .unwrap_or_default()
    }

    /// Token balance held by `account` (the issuer's balance is its treasury).
    pub fn balance(&self, token_id: &str, account: &str) -> Decimal {
        let state = self.state();
        if account == self.issuer_account {
            return state.treasury.get(token_id).copied().unwrap_or_default();
        }
        state
            .balances
            .get(&(token_id.to_string(), account.to_string()))
            .copied()
            .unwrap_or_default()
    }

    /// Every successful mint, oldest first.
    pub fn mints(&self) -> Vec<(String, TokenAmount)> {
        self.state().mints.clone()
    }
}

#[async_trait]
impl LedgerLogTrait for InMemoryLedger {
    async fn append(&self, log_id: &str, memo: &str, payload: Vec<u8>) -> Result<u64> {
        let mut state = self.state();
        if let Some(err) = state.take_failure(LedgerOp::Append) {
            return Err(err.into());
        }
        let log = state.logs.entry(log_id.to_string()).or_default();
        log.push(StoredMessage {
            memo: memo.to_string(),
            payload,
        });
        let sequence_number = log.len() as u64;
        debug!("[InMemoryLedger] {} <- #{} ({})", log_id, sequence_number, memo);
        Ok(sequence_number)
    }

    async fn fetch_latest(&self, log_id: &str) -> Result<LedgerMessage> {
        let mut state = self.state();
        if let Some(err) = state.take_failure(LedgerOp::FetchLatest) {
            return Err(err.into());
        }
        let visible = state
            .logs
            .get(log_id)
            .map(|log| log.len().saturating_sub(state.read_lag))
            .unwrap_or(0);
        if visible == 0 {
            return Err(LedgerError::NotFound(format!("log {} has no messages", log_id)).into());
        }
        let message = &state.logs[log_id][visible - 1];
        Ok(LedgerMessage {
            sequence_number: visible as u64,
            payload: message.payload.clone(),
        })
    }
}

#[async_trait]
impl TokenLedgerTrait for InMemoryLedger {
    async fn mint_supply(&self, token_id: &str, amount: TokenAmount) -> Result<LedgerReceipt> {
        let mut state = self.state();
        if let Some(err) = state.take_failure(LedgerOp::Mint) {
            return Err(err.into());
        }
        *state.treasury.entry(token_id.to_string()).or_default() += amount.amount;
        state.mints.push((token_id.to_string(), amount));
        Ok(LedgerReceipt {
            transaction_id: state.next_transaction_id(&self.issuer_account),
            status: RECEIPT_STATUS_SUCCESS.to_string(),
            sequence_number: None,
        })
    }

    async fn transfer(
        &self,
        token_id: &str,
        to_account: &str,
        amount: TokenAmount,
    ) -> Result<LedgerReceipt> {
        let mut state = self.state();
        if let Some(err) = state.take_failure(LedgerOp::Transfer) {
            return Err(err.into());
        }
        let treasury = state.treasury.entry(token_id.to_string()).or_default();
        if *treasury < amount.amount {
            return Err(LedgerError::RejectedByNetwork {
                status: "INSUFFICIENT_TOKEN_BALANCE".to_string(),
            }
            .into());
        }
        *treasury -= amount.amount;
        *state
            .balances
            .entry((token_id.to_string(), to_account.to_string()))
            .or_default() += amount.amount;
        Ok(LedgerReceipt {
            transaction_id: state.next_transaction_id(&self.issuer_account),
            status: RECEIPT_STATUS_SUCCESS.to_string(),
            sequence_number: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_fetch_latest_returns_newest_message() {
        let ledger = InMemoryLedger::new("0.0.1");
        ledger.append("0.0.200", "a", b"one".to_vec()).await.unwrap();
        let seq = ledger.append("0.0.200", "b", b"two".to_vec()).await.unwrap();
        assert_eq!(seq, 2);

        let latest = ledger.fetch_latest("0.0.200").await.unwrap();
        assert_eq!(latest.sequence_number, 2);
        assert_eq!(latest.payload, b"two");
        assert_eq!(ledger.memos("0.0.200"), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_empty_log_is_not_found() {
        let ledger = InMemoryLedger::new("0.0.1");
        let err = ledger.fetch_latest("0.0.200").await.unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_read_lag_hides_recent_appends() {
        let ledger = InMemoryLedger::new("0.0.1");
        ledger.set_read_lag(1);
        ledger.append("0.0.200", "a", b"one".to_vec()).await.unwrap();
        assert!(ledger.fetch_latest("0.0.200").await.is_err());

        ledger.append("0.0.200", "b", b"two".to_vec()).await.unwrap();
        let latest = ledger.fetch_latest("0.0.200").await.unwrap();
        assert_eq!(latest.payload, b"one");
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let ledger = InMemoryLedger::new("0.0.1");
        ledger.fail_next(
            LedgerOp::Append,
            LedgerError::SubmissionFailed("busy".to_string()),
        );
        assert!(ledger.append("0.0.200", "a", vec![1]).await.is_err());
        assert!(ledger.append("0.0.200", "a", vec![1]).await.is_ok());

        ledger.pass_next(LedgerOp::Transfer);
        ledger.fail_next(LedgerOp::Transfer, LedgerError::Unavailable("x".to_string()));
        let one = TokenAmount::new(dec!(1), 0);
        ledger.mint_supply("0.0.9", one).await.unwrap();
        ledger.mint_supply("0.0.9", one).await.unwrap();
        assert!(ledger.transfer("0.0.9", "0.0.100", one).await.is_ok());
        assert!(ledger.transfer("0.0.9", "0.0.100", one).await.is_err());
        assert!(ledger.transfer("0.0.9", "0.0.100", one).await.is_ok());

        ledger.fail_always(LedgerOp::Mint, LedgerError::SigningFailed("key".to_string()));
        for _ in 0..2 {
            assert!(ledger
                .mint_supply("0.0.9", TokenAmount::new(dec!(1), 0))
                .await
                .is_err());
        }
        ledger.clear_failures();
        assert!(ledger
            .mint_supply("0.0.9", TokenAmount::new(dec!(1), 0))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_transfer_moves_treasury_supply() {
        let ledger = InMemoryLedger::new("0.0.1");
        let amount = TokenAmount::new(dec!(12.5), 2);
        ledger.mint_supply("0.0.9", amount).await.unwrap();
        assert_eq!(ledger.balance("0.0.9", "0.0.1"), dec!(12.5));

        ledger.transfer("0.0.9", "0.0.100", amount).await.unwrap();
        assert_eq!(ledger.balance("0.0.9", "0.0.1"), Decimal::ZERO);
        assert_eq!(ledger.balance("0.0.9", "0.0.100"), dec!(12.5));

        let err = ledger.transfer("0.0.9", "0.0.100", amount).await.unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::RejectedByNetwork);
    }
}
