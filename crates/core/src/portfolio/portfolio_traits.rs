use async_trait::async_trait;

use super::portfolio_model::PortfolioSummary;
use crate::brokerage::{BrokerPosition, PortfolioHistory};
use crate::errors::Result;

#[async_trait]
pub trait PortfolioServiceTrait: Send + Sync {
    async fn portfolio_summary(&self, account_id: &str) -> Result<PortfolioSummary>;

    async fn positions(&self) -> Result<Vec<BrokerPosition>>;

    async fn portfolio_history(&self, period: &str, timeframe: &str) -> Result<PortfolioHistory>;
}
