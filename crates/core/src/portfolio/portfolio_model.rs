use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Headline figures shown for an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub account_id: String,
    pub portfolio_value: Decimal,
    pub cash: Decimal,
    pub currency: String,
    /// Open brokerage positions.
    pub position_count: usize,
    /// Entries in the account's tokenized holdings.
    pub tokenized_count: usize,
}
