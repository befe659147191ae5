//! Wire format of account snapshots stored in ledger log messages.
//!
//! Snapshots are JSON documents. Field names follow the format already
//! present in existing logs, which differs from the domain naming, so the
//! codec goes through private wire structs instead of deriving the format on
//! the domain types.
//!
//! Amounts are JSON numbers written and read digit for digit, so a decimal
//! survives any number of read-modify-write cycles unchanged.
//!
//! Decoding is tolerant of older shapes: every field except the account id
//! may be missing or `null` and falls back to its default. Unknown fields are
//! ignored. There is no schema version; evolution is additive only.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::accounts_model::{AccountSnapshot, LoanPosition, Profile, TokenizedHolding};
use crate::errors::CodecError;

/// Serializes a snapshot into a ledger message payload.
pub fn encode(snapshot: &AccountSnapshot) -> Result<Vec<u8>, CodecError> {
    let wire = SnapshotWire::from(snapshot);
    Ok(serde_json::to_vec(&wire)?)
}

/// Parses a ledger message payload back into a snapshot.
///
/// Fails with [`CodecError::MalformedPayload`] when the payload is not a JSON
/// object of the expected shape or carries no account id.
pub fn decode(payload: &[u8]) -> Result<AccountSnapshot, CodecError> {
    let wire: SnapshotWire = serde_json::from_slice(payload)?;
    if wire.user_account_id.trim().is_empty() {
        return Err(CodecError::MalformedPayload(
            "snapshot has no userAccountId".to_string(),
        ));
    }
    Ok(wire.into())
}

/// Writes a decimal as a JSON number with every digit kept.
fn exact<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    rust_decimal::serde::arbitrary_precision::serialize(value, serializer)
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotWire {
    user_account_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    topic_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    updated_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    personal_information: ProfileWire,
    /// Older snapshots kept the avatar at the top level.
    #[serde(default, deserialize_with = "null_as_default")]
    profile_picture: String,
    #[serde(default, deserialize_with = "null_as_default")]
    loan_status: Vec<LoanWire>,
    #[serde(default, deserialize_with = "null_as_default")]
    tokenized_assets: Vec<HoldingWire>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ProfileWire {
    #[serde(deserialize_with = "null_as_default")]
    username: String,
    #[serde(deserialize_with = "null_as_default")]
    email: String,
    #[serde(deserialize_with = "null_as_default")]
    bio: String,
    #[serde(deserialize_with = "null_as_default")]
    profile_picture: String,
    #[serde(deserialize_with = "null_as_default")]
    topic_id: String,
    #[serde(deserialize_with = "null_as_default")]
    user_account_id: String,
    #[serde(deserialize_with = "null_as_default")]
    profile_message_length: i64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct LoanWire {
    #[serde(deserialize_with = "null_as_default")]
    collateral_token: String,
    #[serde(serialize_with = "exact", deserialize_with = "null_as_default")]
    collateral_amount: Decimal,
    #[serde(deserialize_with = "null_as_default")]
    borrowed_token: String,
    #[serde(serialize_with = "exact", deserialize_with = "null_as_default")]
    borrowed_amount: Decimal,
    #[serde(serialize_with = "exact", deserialize_with = "null_as_default")]
    apy: Decimal,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct HoldingWire {
    #[serde(deserialize_with = "null_as_default")]
    stock_symbol: String,
    #[serde(serialize_with = "exact", deserialize_with = "null_as_default")]
    stock_price: Decimal,
    #[serde(serialize_with = "exact", deserialize_with = "null_as_default")]
    stock_change: Decimal,
    #[serde(
        rename = "unrealizedPL",
        serialize_with = "exact",
        deserialize_with = "null_as_default"
    )]
    unrealized_pl: Decimal,
    #[serde(deserialize_with = "null_as_default")]
    stock_logo: String,
    #[serde(serialize_with = "exact", deserialize_with = "null_as_default")]
    tokenized_amount: Decimal,
}

impl From<&AccountSnapshot> for SnapshotWire {
    fn from(s: &AccountSnapshot) -> Self {
        Self {
            user_account_id: s.account_id.clone(),
            topic_id: s.log_id.clone(),
            created_at: s.created_at,
            updated_at: s.updated_at,
            personal_information: ProfileWire {
                username: s.profile.display_name.clone(),
                email: s.profile.contact.clone(),
                bio: s.profile.bio.clone(),
                profile_picture: s.profile.avatar_ref.clone(),
                topic_id: s.log_id.clone(),
                user_account_id: s.account_id.clone(),
                profile_message_length: s.profile.message_length,
            },
            profile_picture: s.profile.avatar_ref.clone(),
            loan_status: s
                .loan_positions
                .iter()
                .map(|l| LoanWire {
                    collateral_token: l.collateral_asset.clone(),
                    collateral_amount: l.collateral_amount,
                    borrowed_token: l.borrowed_asset.clone(),
                    borrowed_amount: l.borrowed_amount,
                    apy: l.annual_rate,
                })
                .collect(),
            tokenized_assets: s
                .tokenized_holdings
                .iter()
                .map(|h| HoldingWire {
                    stock_symbol: h.symbol.clone(),
                    stock_price: h.reference_price,
                    stock_change: h.daily_change,
                    unrealized_pl: h.unrealized_pl,
                    stock_logo: h.logo_ref.clone(),
                    tokenized_amount: h.tokenized_amount,
                })
                .collect(),
        }
    }
}

impl From<SnapshotWire> for AccountSnapshot {
    fn from(w: SnapshotWire) -> Self {
        let avatar_ref = if w.personal_information.profile_picture.is_empty() {
            w.profile_picture
        } else {
            w.personal_information.profile_picture
        };
        Self {
            account_id: w.user_account_id,
            log_id: w.topic_id,
            created_at: w.created_at,
            updated_at: w.updated_at,
            profile: Profile {
                display_name: w.personal_information.username,
                contact: w.personal_information.email,
                bio: w.personal_information.bio,
                avatar_ref,
                message_length: w.personal_information.profile_message_length,
            },
            loan_positions: w
                .loan_status
                .into_iter()
                .map(|l| LoanPosition {
                    collateral_asset: l.collateral_token,
                    collateral_amount: l.collateral_amount,
                    borrowed_asset: l.borrowed_token,
                    borrowed_amount: l.borrowed_amount,
                    annual_rate: l.apy,
                })
                .collect(),
            tokenized_holdings: w
                .tokenized_assets
                .into_iter()
                .map(|h| TokenizedHolding {
                    symbol: h.stock_symbol,
                    reference_price: h.stock_price,
                    daily_change: h.stock_change,
                    unrealized_pl: h.unrealized_pl,
                    logo_ref: h.stock_logo,
                    tokenized_amount: h.tokenized_amount,
                })
                .collect(),
        }
    }
}
