//! Tokenization module - mint, record and transfer brokerage holdings as
//! ledger tokens.

mod tokenization_errors;
mod tokenization_model;
mod tokenization_service;
mod tokenization_traits;


pub use tokenization_errors::SagaFailure;
pub use tokenization_model::{
    EligibleAsset, SagaAction, SagaStep, TokenizationConfig, TokenizationReceipt,
    TokenizationSummary,
};
pub use tokenization_service::TokenizationService;
pub use tokenization_traits::TokenizationServiceTrait;
