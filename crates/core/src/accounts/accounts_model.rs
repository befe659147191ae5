//! Account snapshot domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Personal details carried inside every snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub display_name: String,
    /// Contact address (email).
    pub contact: String,
    pub bio: String,
    /// Reference to the avatar image (URL or content id).
    pub avatar_ref: String,
    /// Free-form counter maintained by clients.
    pub message_length: i64,
}

/// One open loan: collateral posted against an amount borrowed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanPosition {
    pub collateral_asset: String,
    pub collateral_amount: Decimal,
    pub borrowed_asset: String,
    pub borrowed_amount: Decimal,
    pub annual_rate: Decimal,
}

/// Tokenized representation of a brokerage holding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenizedHolding {
    pub symbol: String,
    pub reference_price: Decimal,
    pub daily_change: Decimal,
    #[serde(rename = "unrealizedPL")]
    pub unrealized_pl: Decimal,
    pub logo_ref: String,
    pub tokenized_amount: Decimal,
}

/// Result of merging a tokenized amount into a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// No entry existed for the symbol; one was appended.
    Inserted,
    /// The existing entry's amount was incremented.
    Incremented,
}

/// Full account state as stored in one ledger log message.
///
/// Every append writes a complete snapshot. The most recent message of the
/// account's log is the current state; older messages are history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSnapshot {
    pub account_id: String,
    pub log_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub profile: Profile,
    pub loan_positions: Vec<LoanPosition>,
    pub tokenized_holdings: Vec<TokenizedHolding>,
}

impl AccountSnapshot {
    /// Builds the snapshot written at registration: no loans, no holdings,
    /// `created_at == updated_at`.
    pub fn initial(
        account_id: impl Into<String>,
        log_id: impl Into<String>,
        profile: Profile,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            log_id: log_id.into(),
            created_at: now,
            updated_at: now,
            profile,
            loan_positions: Vec::new(),
            tokenized_holdings: Vec::new(),
        }
    }

    /// Returns the holding for `symbol`, if any.
    pub fn holding(&self, symbol: &str) -> Option<&TokenizedHolding> {
        self.tokenized_holdings.iter().find(|h| h.symbol == symbol)
    }

    /// Merges a freshly minted amount into `tokenized_holdings`.
    ///
    /// `minted.tokenized_amount` is the amount to add. If the symbol is not
    /// held yet the entry is appended as-is; otherwise the existing amount is
    /// incremented and the market fields are refreshed from `minted`.
    pub fn merge_tokenized(&mut self, minted: TokenizedHolding) -> MergeOutcome {
        match self
            .tokenized_holdings
            .iter_mut()
            .find(|h| h.symbol == minted.symbol)
        {
            Some(existing) => {
                existing.tokenized_amount += minted.tokenized_amount;
                existing.reference_price = minted.reference_price;
                existing.daily_change = minted.daily_change;
                existing.unrealized_pl = minted.unrealized_pl;
                if !minted.logo_ref.is_empty() {
                    existing.logo_ref = minted.logo_ref;
                }
                MergeOutcome::Incremented
            }
            None => {
                self.tokenized_holdings.push(minted);
                MergeOutcome::Inserted
            }
        }
    }
}

/// Outcome of a successful registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredAccount {
    pub account_id: String,
    pub log_id: String,
    pub sequence_number: u64,
}
