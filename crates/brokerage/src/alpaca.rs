//! Alpaca trading API client.
//!
//! Prices and quantities arrive as decimal strings; history series arrive as
//! JSON numbers and may contain `null` for intervals without data.

use std::str::FromStr;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;

use hashvault_core::brokerage::{
    BrokerAccountSummary, BrokerPosition, BrokerageError, BrokerageProviderTrait,
    PortfolioHistory,
};
use hashvault_core::errors::{Error, Result};

use crate::config::BrokerageConfig;

const HEADER_KEY_ID: &str = "APCA-API-KEY-ID";
const HEADER_SECRET: &str = "APCA-API-SECRET-KEY";

// ─────────────────────────────────────────────────────────────────────────────
// API Response Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, serde::Deserialize)]
struct ApiPosition {
    symbol: String,
    #[serde(default)]
    qty: Option<String>,
    #[serde(default)]
    qty_available: Option<String>,
    #[serde(default)]
    current_price: Option<String>,
    #[serde(default)]
    change_today: Option<String>,
    #[serde(default)]
    unrealized_pl: Option<String>,
    #[serde(default)]
    market_value: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct ApiAccount {
    #[serde(default)]
    account_number: Option<String>,
    #[serde(default)]
    portfolio_value: Option<String>,
    #[serde(default)]
    equity: Option<String>,
    #[serde(default)]
    cash: Option<String>,
    #[serde(default)]
    currency: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct ApiPortfolioHistory {
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    equity: Vec<Option<f64>>,
    #[serde(default)]
    profit_loss: Vec<Option<f64>>,
    #[serde(default)]
    profit_loss_pct: Vec<Option<f64>>,
    #[serde(default)]
    base_value: Option<f64>,
    #[serde(default)]
    timeframe: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    message: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversions
// ─────────────────────────────────────────────────────────────────────────────

/// Parses an optional decimal string; absent values are zero.
fn decimal(field: &str, value: Option<&str>) -> std::result::Result<Decimal, BrokerageError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(Decimal::ZERO),
        Some(v) => Decimal::from_str(v)
            .or_else(|_| Decimal::from_scientific(v))
            .map_err(|e| BrokerageError::InvalidResponse(format!("{} = {:?}: {}", field, v, e))),
    }
}

/// Converts a history series; `null` points become zero so all series stay
/// index-aligned with `timestamp`.
fn series(values: Vec<Option<f64>>) -> Vec<Decimal> {
    values
        .into_iter()
        .map(|v| v.and_then(Decimal::from_f64).unwrap_or_default())
        .collect()
}

impl TryFrom<ApiPosition> for BrokerPosition {
    type Error = BrokerageError;

    fn try_from(p: ApiPosition) -> std::result::Result<Self, Self::Error> {
        let qty = decimal("qty", p.qty.as_deref())?;
        let qty_available = match p.qty_available.as_deref() {
            Some(v) => decimal("qty_available", Some(v))?,
            None => qty,
        };
        Ok(BrokerPosition {
            qty,
            qty_available,
            current_price: decimal("current_price", p.current_price.as_deref())?,
            change_today: decimal("change_today", p.change_today.as_deref())?,
            unrealized_pl: decimal("unrealized_pl", p.unrealized_pl.as_deref())?,
            market_value: decimal("market_value", p.market_value.as_deref())?,
            symbol: p.symbol,
        })
    }
}

impl TryFrom<ApiAccount> for BrokerAccountSummary {
    type Error = BrokerageError;

    fn try_from(a: ApiAccount) -> std::result::Result<Self, Self::Error> {
        let portfolio_value = a.portfolio_value.as_deref().or(a.equity.as_deref());
        Ok(BrokerAccountSummary {
            account_number: a.account_number.unwrap_or_default(),
            portfolio_value: decimal("portfolio_value", portfolio_value)?,
            cash: decimal("cash", a.cash.as_deref())?,
            currency: a.currency.unwrap_or_else(|| "USD".to_string()),
        })
    }
}

impl From<ApiPortfolioHistory> for PortfolioHistory {
    fn from(h: ApiPortfolioHistory) -> Self {
        PortfolioHistory {
            timestamp: h.timestamp,
            equity: series(h.equity),
            profit_loss: series(h.profit_loss),
            profit_loss_pct: series(h.profit_loss_pct),
            base_value: h.base_value.and_then(Decimal::from_f64).unwrap_or_default(),
            timeframe: h.timeframe.unwrap_or_default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────────────────────────

/// Read-only client for an Alpaca-compatible brokerage account.
#[derive(Debug, Clone)]
pub struct AlpacaClient {
    client: reqwest::Client,
    base_url: String,
    key_id: HeaderValue,
    secret: HeaderValue,
}

impl AlpacaClient {
    pub fn new(config: BrokerageConfig) -> Result<Self> {
        let header = |name: &str, v: &str| {
            let mut value = HeaderValue::from_str(v)
                .map_err(|e| BrokerageError::AuthError(format!("invalid {}: {}", name, e)))?;
            value.set_sensitive(true);
            Ok::<_, Error>(value)
        };
        let key_id = header("key id", &config.key_id)?;
        let secret = header("secret", &config.secret)?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Unexpected(format!("Failed to initialize HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            key_id,
            secret,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(HEADER_KEY_ID, self.key_id.clone());
        headers.insert(HEADER_SECRET, self.secret.clone());
        headers
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> std::result::Result<T, BrokerageError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("[Brokerage] GET {}", url);

        let response = self
            .client
            .get(&url)
            .headers(self.headers())
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BrokerageError::Unavailable(format!("{} timed out", url))
                } else {
                    BrokerageError::Unavailable(format!("{} failed: {}", url, e))
                }
            })?;

        Self::parse_response(&url, response).await
    }

    async fn parse_response<T: DeserializeOwned>(
        url: &str,
        response: reqwest::Response,
    ) -> std::result::Result<T, BrokerageError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BrokerageError::Unavailable(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| body.chars().take(200).collect());
            let detail = format!("HTTP {}: {}", status.as_u16(), message);
            warn!("[Brokerage] {} returned {}", url, detail);
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    BrokerageError::AuthError(detail)
                }
                StatusCode::NOT_FOUND => BrokerageError::NotFound(detail),
                StatusCode::TOO_MANY_REQUESTS => BrokerageError::Unavailable(detail),
                s if s.is_server_error() => BrokerageError::Unavailable(detail),
                _ => BrokerageError::InvalidResponse(detail),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            BrokerageError::InvalidResponse(format!(
                "Failed to parse response: {} - {}",
                e,
                body.chars().take(200).collect::<String>()
            ))
        })
    }
}

#[async_trait]
impl BrokerageProviderTrait for AlpacaClient {
    async fn get_positions(&self) -> Result<Vec<BrokerPosition>> {
        let positions: Vec<ApiPosition> = self.get("/v2/positions", &[]).await?;
        let positions = positions
            .into_iter()
            .map(BrokerPosition::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        debug!("[Brokerage] {} open positions", positions.len());
        Ok(positions)
    }

    async fn get_position(&self, symbol: &str) -> Result<BrokerPosition> {
        let path = format!("/v2/positions/{}", symbol.trim().to_uppercase());
        let position: ApiPosition = self.get(&path, &[]).await.map_err(|e| match e {
            BrokerageError::NotFound(_) => {
                BrokerageError::NotFound(format!("no open position in {}", symbol))
            }
            other => other,
        })?;
        Ok(position.try_into()?)
    }

    async fn get_account(&self) -> Result<BrokerAccountSummary> {
        let account: ApiAccount = self.get("/v2/account", &[]).await?;
        Ok(account.try_into()?)
    }

    async fn get_portfolio_history(
        &self,
        period: &str,
        timeframe: &str,
    ) -> Result<PortfolioHistory> {
        let history: ApiPortfolioHistory = self
            .get(
                "/v2/account/portfolio/history",
                &[("period", period), ("timeframe", timeframe)],
            )
            .await?;
        Ok(history.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_client_creation() {
        let config = BrokerageConfig::new("key", "secret").with_base_url("http://localhost:9/");
        let client = AlpacaClient::new(config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9");
    }

    #[test]
    fn test_client_rejects_unprintable_credentials() {
        let config = BrokerageConfig::new("key\n", "secret");
        let err = AlpacaClient::new(config).err().unwrap();
        assert_eq!(err.kind(), hashvault_core::ErrorKind::AuthError);
    }

    #[test]
    fn test_position_conversion() {
        let api: ApiPosition = serde_json::from_str(
            r#"{"symbol":"AAPL","qty":"12.5","qty_available":"10","current_price":"190.12",
                "change_today":"0.0123","unrealized_pl":"-4.5","market_value":"2376.5",
                "exchange":"NASDAQ"}"#,
        )
        .unwrap();
        let p = BrokerPosition::try_from(api).unwrap();
        assert_eq!(p.symbol, "AAPL");
        assert_eq!(p.qty, dec!(12.5));
        assert_eq!(p.qty_available, dec!(10));
        assert_eq!(p.current_price, dec!(190.12));
        assert_eq!(p.unrealized_pl, dec!(-4.5));
    }

    #[test]
    fn test_position_without_available_qty_uses_qty() {
        let api: ApiPosition = serde_json::from_str(r#"{"symbol":"MSFT","qty":"3"}"#).unwrap();
        let p = BrokerPosition::try_from(api).unwrap();
        assert_eq!(p.qty_available, dec!(3));
        assert_eq!(p.current_price, Decimal::ZERO);
    }

    #[test]
    fn test_position_with_garbage_number_is_invalid() {
        let api: ApiPosition =
            serde_json::from_str(r#"{"symbol":"MSFT","qty":"three"}"#).unwrap();
        assert!(matches!(
            BrokerPosition::try_from(api),
            Err(BrokerageError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_history_nulls_keep_alignment() {
        let api: ApiPortfolioHistory = serde_json::from_str(
            r#"{"timestamp":[1,2,3],"equity":[100.5,null,101],"profit_loss":[0,null,0.5],
                "profit_loss_pct":[0,null,0.005],"base_value":100,"timeframe":"1H"}"#,
        )
        .unwrap();
        let h = PortfolioHistory::from(api);
        assert_eq!(h.timestamp.len(), 3);
        assert_eq!(h.equity, vec![dec!(100.5), Decimal::ZERO, dec!(101)]);
        assert_eq!(h.base_value, dec!(100));
        assert_eq!(h.timeframe, "1H");
    }
}
