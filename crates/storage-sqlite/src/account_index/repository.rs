use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;

use hashvault_core::accounts::AccountIndexRepositoryTrait;
use hashvault_core::errors::{DatabaseError, Result};

use super::model::{AccountIndexDB, NewAccountIndexDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::account_index;

/// Identifier index stored in the `account_index` table.
///
/// Reads use pooled connections; inserts go through the writer actor.
pub struct AccountIndexRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl AccountIndexRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    fn find(&self, id: &str) -> Result<Option<AccountIndexDB>> {
        let mut conn = get_connection(&self.pool)?;
        account_index::table
            .find(id)
            .select(AccountIndexDB::as_select())
            .first::<AccountIndexDB>(&mut conn)
            .optional()
            .into_core()
    }
}

#[async_trait]
impl AccountIndexRepositoryTrait for AccountIndexRepository {
    async fn put(&self, account_id: &str, log_id: &str) -> Result<()> {
        let row = NewAccountIndexDB {
            account_id: account_id.to_string(),
            log_id: log_id.to_string(),
            created_at: Utc::now().naive_utc(),
        };
        debug!("Indexing account {} -> {}", row.account_id, row.log_id);

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::insert_into(account_index::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(())
            })
            .await
    }

    fn get(&self, account_id: &str) -> Result<String> {
        self.find(account_id)?
            .map(|row| row.log_id)
            .ok_or_else(|| DatabaseError::NotFound(format!("account {}", account_id)).into())
    }

    fn contains(&self, account_id: &str) -> Result<bool> {
        Ok(self.find(account_id)?.is_some())
    }
}
