//! Portfolio module - brokerage figures combined with the account snapshot.

mod portfolio_model;
mod portfolio_service;
mod portfolio_traits;

pub use portfolio_model::PortfolioSummary;
pub use portfolio_service::PortfolioService;
pub use portfolio_traits::PortfolioServiceTrait;
