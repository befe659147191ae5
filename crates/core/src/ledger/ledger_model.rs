use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::RECEIPT_STATUS_SUCCESS;
use crate::errors::ValidationError;

/// One message read back from a ledger log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerMessage {
    /// Position of the message in the log; the first message is 1.
    pub sequence_number: u64,
    pub payload: Vec<u8>,
}

/// Consensus receipt of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerReceipt {
    pub transaction_id: String,
    pub status: String,
    /// Set for log appends.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<u64>,
}

impl LedgerReceipt {
    pub fn is_success(&self) -> bool {
        self.status == RECEIPT_STATUS_SUCCESS
    }
}

/// Ledger entity id in `<shard>.<realm>.<num>` form, e.g. `0.0.6509511`.
///
/// An optional checksum suffix (`0.0.123-abcde`) is accepted and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LedgerEntityId {
    pub shard: u64,
    pub realm: u64,
    pub num: u64,
}

impl FromStr for LedgerEntityId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidLedgerId(s.to_string());
        let body = s.trim().split('-').next().ok_or_else(invalid)?;
        let mut parts = body.split('.');
        let mut next = || -> Result<u64, ValidationError> {
            parts
                .next()
                .filter(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
                .and_then(|p| p.parse().ok())
                .ok_or_else(invalid)
        };
        let id = LedgerEntityId {
            shard: next()?,
            realm: next()?,
            num: next()?,
        };
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(id)
    }
}

impl fmt::Display for LedgerEntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

/// Token quantity together with the token's decimal precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAmount {
    pub amount: Decimal,
    pub decimals: u32,
}

impl TokenAmount {
    pub fn new(amount: Decimal, decimals: u32) -> Self {
        Self { amount, decimals }
    }

    /// Converts to the integer unit count the network expects.
    ///
    /// Fails when the amount is negative, has more fractional digits than the
    /// token supports, or does not fit in a `u64`.
    pub fn base_units(&self) -> Result<u64, ValidationError> {
        let unrepresentable = || ValidationError::UnrepresentableAmount {
            amount: self.amount.to_string(),
            decimals: self.decimals,
        };
        if self.amount.is_sign_negative() {
            return Err(unrepresentable());
        }
        let mut units = self.amount;
        for _ in 0..self.decimals {
            units = units.checked_mul(Decimal::TEN).ok_or_else(unrepresentable)?;
        }
        if units.normalize().fract() != Decimal::ZERO {
            return Err(unrepresentable());
        }
        units.to_u64().ok_or_else(unrepresentable)
    }
}
