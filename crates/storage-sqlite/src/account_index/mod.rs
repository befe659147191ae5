//! Identifier index: account id -> ledger log id.

mod model;
mod repository;

pub use model::{AccountIndexDB, NewAccountIndexDB};
pub use repository::AccountIndexRepository;
