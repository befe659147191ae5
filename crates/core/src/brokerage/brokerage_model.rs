//! Brokerage domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One open position held at the broker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerPosition {
    pub symbol: String,
    pub qty: Decimal,
    /// Quantity not locked by open orders.
    pub qty_available: Decimal,
    pub current_price: Decimal,
    /// Fractional price change since the previous close (0.012 = +1.2%).
    pub change_today: Decimal,
    pub unrealized_pl: Decimal,
    pub market_value: Decimal,
}

/// Top-level figures of the brokerage account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerAccountSummary {
    pub account_number: String,
    pub portfolio_value: Decimal,
    pub cash: Decimal,
    pub currency: String,
}

/// Equity time series of the brokerage account.
///
/// All vectors have the same length; index `i` of each describes the same
/// point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioHistory {
    /// Unix timestamps in seconds.
    pub timestamp: Vec<i64>,
    pub equity: Vec<Decimal>,
    pub profit_loss: Vec<Decimal>,
    pub profit_loss_pct: Vec<Decimal>,
    pub base_value: Decimal,
    pub timeframe: String,
}
