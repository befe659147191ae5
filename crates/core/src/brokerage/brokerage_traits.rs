use async_trait::async_trait;

use super::brokerage_model::{BrokerAccountSummary, BrokerPosition, PortfolioHistory};
use crate::errors::Result;

/// Read-only access to the brokerage account backing the platform.
#[async_trait]
pub trait BrokerageProviderTrait: Send + Sync {
    /// Lists all open positions.
    async fn get_positions(&self) -> Result<Vec<BrokerPosition>>;

    /// Returns the open position in `symbol`. Fails with a not-found
    /// brokerage error when nothing is held.
    async fn get_position(&self, symbol: &str) -> Result<BrokerPosition>;

    async fn get_account(&self) -> Result<BrokerAccountSummary>;

    /// Equity history over `period` (e.g. `30D`, `1A`) sampled at
    /// `timeframe` (e.g. `1H`, `1D`).
    async fn get_portfolio_history(&self, period: &str, timeframe: &str)
        -> Result<PortfolioHistory>;
}
