//! Accounts module - snapshot model, codec, state store and traits.

mod accounts_model;
mod accounts_service;
mod accounts_traits;
pub mod snapshot_codec;


// Re-export the public interface
pub use accounts_model::{
    AccountSnapshot, LoanPosition, MergeOutcome, Profile, RegisteredAccount, TokenizedHolding,
};
pub use accounts_service::AccountStateStore;
pub use accounts_traits::{AccountIndexRepositoryTrait, AccountStateStoreTrait};
