//! Database models for the identifier index.

use chrono::NaiveDateTime;
use diesel::prelude::*;

/// One row of the identifier index.
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::account_index)]
#[diesel(primary_key(account_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccountIndexDB {
    pub account_id: String,
    pub log_id: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::account_index)]
pub struct NewAccountIndexDB {
    pub account_id: String,
    pub log_id: String,
    pub created_at: NaiveDateTime,
}
