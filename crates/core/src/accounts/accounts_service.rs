use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use log::{debug, error, info};

use super::accounts_model::{AccountSnapshot, Profile, RegisteredAccount};
use super::accounts_traits::{AccountIndexRepositoryTrait, AccountStateStoreTrait};
use super::snapshot_codec;
use crate::constants::{MEMO_ACCOUNT_REGISTERED, MEMO_PROFILE_UPDATED};
use crate::errors::{CodecError, DatabaseError, Error, Result, ValidationError};
use crate::ledger::{LedgerEntityId, LedgerLogTrait};

/// State store that keeps every account's current state as the latest
/// message of its ledger log.
pub struct AccountStateStore {
    index: Arc<dyn AccountIndexRepositoryTrait>,
    ledger: Arc<dyn LedgerLogTrait>,
}

impl AccountStateStore {
    pub fn new(
        index: Arc<dyn AccountIndexRepositoryTrait>,
        ledger: Arc<dyn LedgerLogTrait>,
    ) -> Self {
        Self { index, ledger }
    }

    fn resolve(&self, account_id: &str) -> Result<String> {
        match self.index.get(account_id) {
            Err(Error::Database(DatabaseError::NotFound(_))) => {
                Err(Error::UnregisteredAccount(account_id.to_string()))
            }
            other => other,
        }
    }

    /// Single write path for existing accounts. Stamps `snapshot` with the
    /// indexed log id and the next `updated_at` before appending it.
    async fn write_state(
        &self,
        account_id: &str,
        snapshot: &mut AccountSnapshot,
        memo: &str,
    ) -> Result<u64> {
        if snapshot.account_id != account_id {
            return Err(ValidationError::InvalidInput(format!(
                "snapshot of account {} cannot be written to account {}",
                snapshot.account_id, account_id
            ))
            .into());
        }
        let log_id = self.resolve(account_id)?;
        snapshot.log_id = log_id.clone();
        snapshot.updated_at = next_updated_at(snapshot.updated_at);
        self.append(&log_id, snapshot, memo).await
    }

    async fn append(&self, log_id: &str, snapshot: &AccountSnapshot, memo: &str) -> Result<u64> {
        let payload = snapshot_codec::encode(snapshot)?;
        let sequence_number = self.ledger.append(log_id, memo, payload).await?;
        debug!(
            "[StateStore] Appended '{}' for {} to {} at #{}",
            memo, snapshot.account_id, log_id, sequence_number
        );
        Ok(sequence_number)
    }
}

/// Next `updated_at` for a snapshot last written at `previous`.
///
/// Wall clocks can stall or step back; the result is always strictly later
/// than `previous`.
fn next_updated_at(previous: DateTime<Utc>) -> DateTime<Utc> {
    let floor = previous + Duration::microseconds(1);
    Utc::now().max(floor)
}

fn validate_ledger_id(id: &str) -> Result<()> {
    id.parse::<LedgerEntityId>()?;
    Ok(())
}

#[async_trait]
impl AccountStateStoreTrait for AccountStateStore {
    fn log_id(&self, account_id: &str) -> Result<String> {
        self.resolve(account_id)
    }

    fn is_registered(&self, account_id: &str) -> Result<bool> {
        self.index.contains(account_id)
    }

    async fn get_state(&self, account_id: &str) -> Result<AccountSnapshot> {
        let log_id = self.resolve(account_id)?;
        let message = self.ledger.fetch_latest(&log_id).await?;
        let mut snapshot = snapshot_codec::decode(&message.payload)?;

        if snapshot.account_id != account_id {
            return Err(CodecError::MalformedPayload(format!(
                "log {} message #{} belongs to account {}, expected {}",
                log_id, message.sequence_number, snapshot.account_id, account_id
            ))
            .into());
        }
        if snapshot.log_id.is_empty() {
            snapshot.log_id = log_id;
        }
        Ok(snapshot)
    }

    async fn put_state(
        &self,
        account_id: &str,
        mut snapshot: AccountSnapshot,
        memo: &str,
    ) -> Result<u64> {
        self.write_state(account_id, &mut snapshot, memo).await
    }

    async fn register(
        &self,
        account_id: &str,
        log_id: &str,
        profile: Profile,
    ) -> Result<RegisteredAccount> {
        validate_ledger_id(account_id)?;
        validate_ledger_id(log_id)?;

        self.index.put(account_id, log_id).await?;

        let snapshot = AccountSnapshot::initial(account_id, log_id, profile, Utc::now());
        match self.append(log_id, &snapshot, MEMO_ACCOUNT_REGISTERED).await {
            Ok(sequence_number) => {
                info!(
                    "[StateStore] Registered account {} on log {}",
                    account_id, log_id
                );
                Ok(RegisteredAccount {
                    account_id: account_id.to_string(),
                    log_id: log_id.to_string(),
                    sequence_number,
                })
            }
            Err(e) => {
                error!(
                    "[StateStore] Account {} indexed to {} but initial snapshot failed: {}",
                    account_id, log_id, e
                );
                Err(Error::RegistrationIncomplete {
                    account_id: account_id.to_string(),
                    log_id: log_id.to_string(),
                    source: Box::new(e),
                })
            }
        }
    }

    async fn update_profile(&self, account_id: &str, profile: Profile) -> Result<AccountSnapshot> {
        let mut snapshot = self.get_state(account_id).await?;
        snapshot.profile = profile;
        self.write_state(account_id, &mut snapshot, MEMO_PROFILE_UPDATED)
            .await?;
        Ok(snapshot)
    }
}
