//! Tokenization domain models.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ELIGIBLE_SYMBOL, DEFAULT_ELIGIBLE_TOKEN_ID, DEFAULT_TOKEN_DECIMALS};
use crate::errors::ValidationError;
use crate::ledger::LedgerEntityId;

/// A brokerage symbol that may be tokenized, and the token representing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibleAsset {
    pub symbol: String,
    pub token_id: String,
    /// Decimal precision of the token.
    pub decimals: u32,
    /// Logo recorded on new holdings. Empty falls back to the default logo.
    #[serde(default)]
    pub logo_ref: String,
}

impl EligibleAsset {
    pub fn new(symbol: impl Into<String>, token_id: impl Into<String>, decimals: u32) -> Self {
        Self {
            symbol: symbol.into(),
            token_id: token_id.into(),
            decimals,
            logo_ref: String::new(),
        }
    }
}

/// Parses `SYMBOL=tokenId[:decimals]`, e.g. `AAPL=0.0.6509511:2`.
impl FromStr for EligibleAsset {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            ValidationError::InvalidInput(format!(
                "eligible asset '{}' is not of the form SYMBOL=tokenId[:decimals]",
                s
            ))
        };
        let (symbol, rest) = s.trim().split_once('=').ok_or_else(invalid)?;
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(invalid());
        }
        let (token_id, decimals) = match rest.split_once(':') {
            Some((token_id, decimals)) => (
                token_id.trim(),
                decimals.trim().parse::<u32>().map_err(|_| invalid())?,
            ),
            None => (rest.trim(), DEFAULT_TOKEN_DECIMALS),
        };
        let token_id: LedgerEntityId = token_id.parse()?;
        Ok(EligibleAsset::new(symbol, token_id.to_string(), decimals))
    }
}

/// Allow-list of tokenizable symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizationConfig {
    pub eligible_assets: Vec<EligibleAsset>,
    /// Logo used for symbols without a configured one.
    pub default_logo_ref: String,
}

impl Default for TokenizationConfig {
    fn default() -> Self {
        Self {
            eligible_assets: vec![EligibleAsset::new(
                DEFAULT_ELIGIBLE_SYMBOL,
                DEFAULT_ELIGIBLE_TOKEN_ID,
                DEFAULT_TOKEN_DECIMALS,
            )],
            default_logo_ref: String::new(),
        }
    }
}

impl TokenizationConfig {
    /// Parses a comma separated list of `SYMBOL=tokenId[:decimals]` entries.
    pub fn parse_allow_list(list: &str) -> Result<Vec<EligibleAsset>, ValidationError> {
        let assets = list
            .split(',')
            .filter(|entry| !entry.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<EligibleAsset>, _>>()?;
        if assets.is_empty() {
            return Err(ValidationError::InvalidInput(
                "eligible asset list is empty".to_string(),
            ));
        }
        Ok(assets)
    }

    /// Returns the allow-list entry for `symbol` (case-insensitive).
    pub fn asset(&self, symbol: &str) -> Option<&EligibleAsset> {
        self.eligible_assets
            .iter()
            .find(|a| a.symbol.eq_ignore_ascii_case(symbol))
    }

    /// Logo for `symbol`: the configured one, else the default.
    pub fn logo_for(&self, symbol: &str) -> String {
        self.asset(symbol)
            .map(|a| a.logo_ref.as_str())
            .filter(|logo| !logo.is_empty())
            .unwrap_or(self.default_logo_ref.as_str())
            .to_string()
    }
}

/// Progress marker of one tokenization run. Each step names what has been
/// completed, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SagaStep {
    Start,
    /// Brokerage position found and amount computed.
    Eligible,
    /// New supply exists in the issuer's treasury.
    Minted,
    /// The account snapshot reflects the minted amount.
    Recorded,
    /// Supply transferred to the account.
    Complete,
}

impl fmt::Display for SagaStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SagaStep::Start => "START",
            SagaStep::Eligible => "ELIGIBLE",
            SagaStep::Minted => "MINTED",
            SagaStep::Recorded => "RECORDED",
            SagaStep::Complete => "COMPLETE",
        };
        f.write_str(s)
    }
}

/// The external call a tokenization run was executing when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SagaAction {
    Mint,
    Record,
    Transfer,
}

impl SagaAction {
    /// Step that had been reached when this action was started.
    pub fn reached(&self) -> SagaStep {
        match self {
            SagaAction::Mint => SagaStep::Eligible,
            SagaAction::Record => SagaStep::Minted,
            SagaAction::Transfer => SagaStep::Recorded,
        }
    }
}

impl fmt::Display for SagaAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SagaAction::Mint => "MINT",
            SagaAction::Record => "RECORD",
            SagaAction::Transfer => "TRANSFER",
        };
        f.write_str(s)
    }
}

/// Result of one completed run for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenizationReceipt {
    pub symbol: String,
    pub token_id: String,
    pub amount: Decimal,
    pub mint_transaction_id: String,
    /// Ledger sequence number of the snapshot that recorded the amount.
    pub record_sequence_number: u64,
    pub transfer_transaction_id: String,
}

/// Result of tokenizing every eligible holding of an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenizationSummary {
    pub account_id: String,
    pub receipts: Vec<TokenizationReceipt>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_eligible_asset() {
        let asset: EligibleAsset = "aapl=0.0.6509511".parse().unwrap();
        assert_eq!(asset.symbol, "AAPL");
        assert_eq!(asset.token_id, "0.0.6509511");
        assert_eq!(asset.decimals, DEFAULT_TOKEN_DECIMALS);

        let asset: EligibleAsset = " MSFT = 0.0.42 : 0 ".parse().unwrap();
        assert_eq!(asset.symbol, "MSFT");
        assert_eq!(asset.decimals, 0);
    }

    #[test]
    fn test_parse_eligible_asset_rejects_malformed() {
        for bad in ["AAPL", "=0.0.1", "AAPL=token", "AAPL=0.0.1:x"] {
            assert!(bad.parse::<EligibleAsset>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_parse_allow_list() {
        let assets = TokenizationConfig::parse_allow_list("AAPL=0.0.6509511, MSFT=0.0.7:4,").unwrap();
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[1].decimals, 4);
        assert!(TokenizationConfig::parse_allow_list(" , ").is_err());
    }

    #[test]
    fn test_default_config_allows_aapl() {
        let config = TokenizationConfig::default();
        let asset = config.asset("aapl").unwrap();
        assert_eq!(asset.token_id, "0.0.6509511");
        assert!(config.asset("TSLA").is_none());
    }

    #[test]
    fn test_logo_for_falls_back_to_default() {
        let mut config = TokenizationConfig {
            default_logo_ref: "https://logos.example/default.png".to_string(),
            ..Default::default()
        };
        assert_eq!(config.logo_for("AAPL"), "https://logos.example/default.png");
        assert_eq!(config.logo_for("TSLA"), "https://logos.example/default.png");

        config.eligible_assets[0].logo_ref = "https://logos.example/aapl.png".to_string();
        assert_eq!(config.logo_for("AAPL"), "https://logos.example/aapl.png");
    }

    #[test]
    fn test_saga_step_order_and_names() {
        assert!(SagaStep::Minted < SagaStep::Recorded);
        assert_eq!(SagaStep::Recorded.to_string(), "RECORDED");
        assert_eq!(
            serde_json::to_string(&SagaStep::Complete).unwrap(),
            "\"COMPLETE\""
        );
        assert_eq!(SagaAction::Transfer.reached(), SagaStep::Recorded);
    }
}
