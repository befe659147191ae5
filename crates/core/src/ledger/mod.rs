//! Ledger module - append-only log and token primitives consumed by the core.

mod in_memory;
mod ledger_errors;
mod ledger_model;
mod ledger_traits;

pub use in_memory::{InMemoryLedger, LedgerOp};
pub use ledger_errors::LedgerError;
pub use ledger_model::{LedgerEntityId, LedgerMessage, LedgerReceipt, TokenAmount};
pub use ledger_traits::{LedgerLogTrait, TokenLedgerTrait};
