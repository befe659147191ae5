//! Brokerage provider adapter for Hashvault.
//!
//! Implements [`BrokerageProviderTrait`](hashvault_core::brokerage::BrokerageProviderTrait)
//! against an Alpaca-compatible trading REST API (positions, account and
//! portfolio history). Paper trading is the default endpoint.

mod alpaca;
mod config;

pub use alpaca::AlpacaClient;
pub use config::{BrokerageConfig, DEFAULT_BROKERAGE_URL, DEFAULT_TIMEOUT_SECS};
