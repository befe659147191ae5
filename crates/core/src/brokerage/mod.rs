//! Brokerage module - positions, account and history read from the broker.

mod brokerage_errors;
mod brokerage_model;
mod brokerage_traits;

pub use brokerage_errors::BrokerageError;
pub use brokerage_model::{BrokerAccountSummary, BrokerPosition, PortfolioHistory};
pub use brokerage_traits::BrokerageProviderTrait;
