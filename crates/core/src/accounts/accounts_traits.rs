//! Identifier index and state store traits.

use async_trait::async_trait;

use super::accounts_model::{AccountSnapshot, Profile, RegisteredAccount};
use crate::errors::Result;

/// Persistent mapping from external account id to ledger log id.
///
/// Entries are written once at registration and never updated or deleted.
#[async_trait]
pub trait AccountIndexRepositoryTrait: Send + Sync {
    /// Records `account_id -> log_id`.
    ///
    /// Fails with a unique-violation database error when the account id is
    /// already indexed; an existing entry is never overwritten.
    async fn put(&self, account_id: &str, log_id: &str) -> Result<()>;

    /// Resolves the log id of an account. Fails with a not-found database
    /// error when the account id is unknown.
    fn get(&self, account_id: &str) -> Result<String>;

    /// Returns true when the account id is indexed.
    fn contains(&self, account_id: &str) -> Result<bool>;
}

/// Read-modify-append access to account state kept in ledger logs.
///
/// There is no atomicity between a read and the following append: a
/// concurrent writer's append may land in between and the last append wins.
#[async_trait]
pub trait AccountStateStoreTrait: Send + Sync {
    /// Resolves the account's log id.
    fn log_id(&self, account_id: &str) -> Result<String>;

    /// Returns true when the account has an index entry.
    fn is_registered(&self, account_id: &str) -> Result<bool>;

    /// Reads the latest snapshot of the account.
    ///
    /// The read goes to an eventually-consistent replica and may not yet
    /// reflect an append that has just completed.
    async fn get_state(&self, account_id: &str) -> Result<AccountSnapshot>;

    /// Appends `snapshot` as the account's new state and returns the ledger
    /// sequence number. `updated_at` is set by the store.
    async fn put_state(&self, account_id: &str, snapshot: AccountSnapshot, memo: &str)
        -> Result<u64>;

    /// Indexes the account and appends its initial snapshot.
    async fn register(
        &self,
        account_id: &str,
        log_id: &str,
        profile: Profile,
    ) -> Result<RegisteredAccount>;

    /// Replaces the profile of the latest snapshot and appends the result.
    async fn update_profile(&self, account_id: &str, profile: Profile) -> Result<AccountSnapshot>;
}
