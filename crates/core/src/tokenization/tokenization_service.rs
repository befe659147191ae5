use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, error, info};
use rust_decimal::{Decimal, RoundingStrategy};

use super::tokenization_errors::SagaFailure;
use super::tokenization_model::{
    EligibleAsset, SagaAction, TokenizationConfig, TokenizationReceipt, TokenizationSummary,
};
use super::tokenization_traits::TokenizationServiceTrait;
use crate::accounts::{AccountStateStoreTrait, TokenizedHolding};
use crate::brokerage::{BrokerPosition, BrokerageError, BrokerageProviderTrait};
use crate::constants::MEMO_TOKENIZED_ASSET_MINTED;
use crate::errors::{Error, Result};
use crate::ledger::{LedgerEntityId, TokenAmount, TokenLedgerTrait};

/// Runs the mint -> record -> transfer sequence for brokerage holdings.
///
/// Each step is a separate external call that can fail on its own. Nothing
/// is rolled back: a failure after the mint leaves supply in the issuer's
/// treasury and is reported through [`SagaFailure`].
pub struct TokenizationService {
    config: TokenizationConfig,
    brokerage: Arc<dyn BrokerageProviderTrait>,
    token_ledger: Arc<dyn TokenLedgerTrait>,
    state_store: Arc<dyn AccountStateStoreTrait>,
}

/// Everything needed to tokenize one symbol, computed before any side effect.
struct PlannedMint {
    asset: EligibleAsset,
    amount: TokenAmount,
    holding: TokenizedHolding,
}

impl TokenizationService {
    pub fn new(
        config: TokenizationConfig,
        brokerage: Arc<dyn BrokerageProviderTrait>,
        token_ledger: Arc<dyn TokenLedgerTrait>,
        state_store: Arc<dyn AccountStateStoreTrait>,
    ) -> Self {
        Self {
            config,
            brokerage,
            token_ledger,
            state_store,
        }
    }

    fn ensure_registered(&self, account_id: &str) -> Result<()> {
        account_id.parse::<LedgerEntityId>()?;
        if !self.state_store.is_registered(account_id)? {
            return Err(Error::UnregisteredAccount(account_id.to_string()));
        }
        Ok(())
    }

    /// Returns `None` when the position is not allow-listed or has nothing
    /// available at the token's precision.
    fn plan(&self, position: &BrokerPosition) -> Result<Option<PlannedMint>> {
        let Some(asset) = self.config.asset(&position.symbol) else {
            return Ok(None);
        };
        let quantity = position
            .qty_available
            .round_dp_with_strategy(asset.decimals, RoundingStrategy::ToZero);
        if quantity <= Decimal::ZERO {
            return Ok(None);
        }
        let amount = TokenAmount::new(quantity, asset.decimals);
        amount.base_units()?;

        Ok(Some(PlannedMint {
            asset: asset.clone(),
            amount,
            holding: TokenizedHolding {
                symbol: asset.symbol.clone(),
                reference_price: position.current_price,
                daily_change: position.change_today,
                unrealized_pl: position.unrealized_pl,
                logo_ref: self.config.logo_for(&asset.symbol),
                tokenized_amount: quantity,
            },
        }))
    }

    async fn record(&self, account_id: &str, planned: &PlannedMint) -> Result<u64> {
        let mut snapshot = self.state_store.get_state(account_id).await?;
        let outcome = snapshot.merge_tokenized(planned.holding.clone());
        debug!(
            "[Tokenization] {:?} {} {} into snapshot of {}",
            outcome, planned.amount.amount, planned.asset.symbol, account_id
        );
        self.state_store
            .put_state(account_id, snapshot, MEMO_TOKENIZED_ASSET_MINTED)
            .await
    }

    async fn run(
        &self,
        account_id: &str,
        planned: &PlannedMint,
        completed: &[TokenizationReceipt],
    ) -> Result<TokenizationReceipt> {
        let symbol = planned.asset.symbol.as_str();
        let token_id = planned.asset.token_id.as_str();
        let fail = |action: SagaAction, source: Error| -> Error {
            let failure = SagaFailure::new(
                account_id,
                symbol,
                planned.amount.amount,
                action,
                completed.to_vec(),
                source,
            );
            error!("[Tokenization] {}", failure);
            failure.into()
        };

        let mint = self
            .token_ledger
            .mint_supply(token_id, planned.amount)
            .await
            .map_err(|e| fail(SagaAction::Mint, e))?;
        debug!(
            "[Tokenization] Minted {} of {} ({})",
            planned.amount.amount, token_id, mint.transaction_id
        );

        let record_sequence_number = self
            .record(account_id, planned)
            .await
            .map_err(|e| fail(SagaAction::Record, e))?;

        let transfer = self
            .token_ledger
            .transfer(token_id, account_id, planned.amount)
            .await
            .map_err(|e| fail(SagaAction::Transfer, e))?;

        info!(
            "[Tokenization] Tokenized {} {} for {}",
            planned.amount.amount, symbol, account_id
        );
        Ok(TokenizationReceipt {
            symbol: symbol.to_string(),
            token_id: token_id.to_string(),
            amount: planned.amount.amount,
            mint_transaction_id: mint.transaction_id,
            record_sequence_number,
            transfer_transaction_id: transfer.transaction_id,
        })
    }
}

#[async_trait]
impl TokenizationServiceTrait for TokenizationService {
    fn eligible_assets(&self) -> Vec<EligibleAsset> {
        self.config.eligible_assets.clone()
    }

    fn logo_for(&self, symbol: &str) -> String {
        self.config.logo_for(symbol)
    }

    async fn tokenize_symbol(
        &self,
        account_id: &str,
        symbol: &str,
    ) -> Result<TokenizationReceipt> {
        self.ensure_registered(account_id)?;
        if self.config.asset(symbol).is_none() {
            return Err(Error::IneligibleAsset(format!(
                "{} is not on the allow-list",
                symbol
            )));
        }

        let position = match self.brokerage.get_position(symbol).await {
            Err(Error::Brokerage(BrokerageError::NotFound(_))) => {
                return Err(Error::IneligibleAsset(format!(
                    "no brokerage position in {}",
                    symbol
                )))
            }
            other => other?,
        };
        let planned = self.plan(&position)?.ok_or_else(|| {
            Error::IneligibleAsset(format!("no available quantity of {}", symbol))
        })?;

        self.run(account_id, &planned, &[]).await
    }

    async fn tokenize_portfolio(&self, account_id: &str) -> Result<TokenizationSummary> {
        self.ensure_registered(account_id)?;

        let positions = self.brokerage.get_positions().await?;
        let mut plans = Vec::new();
        for position in &positions {
            if let Some(planned) = self.plan(position)? {
                plans.push(planned);
            }
        }
        if plans.is_empty() {
            return Err(Error::IneligibleAsset(
                "no allow-listed holdings in the portfolio".to_string(),
            ));
        }
        debug!(
            "[Tokenization] {} of {} positions eligible for {}",
            plans.len(),
            positions.len(),
            account_id
        );

        let mut receipts = Vec::with_capacity(plans.len());
        for planned in &plans {
            let receipt = self.run(account_id, planned, &receipts).await?;
            receipts.push(receipt);
        }

        Ok(TokenizationSummary {
            account_id: account_id.to_string(),
            receipts,
        })
    }
}
