//! Process configuration, read once at startup from the environment.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{anyhow, Context};
use hashvault_brokerage::{BrokerageConfig, DEFAULT_BROKERAGE_URL, DEFAULT_TIMEOUT_SECS};
use hashvault_core::tokenization::TokenizationConfig;
use hashvault_ledger::{
    LedgerClientConfig, DEFAULT_MIRROR_NODE_URL, DEFAULT_READ_TIMEOUT_SECS,
    DEFAULT_SUBMIT_TIMEOUT_SECS,
};

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_PATH: &str = "./db/index.db";
/// Above the longest tokenization path (three ledger submissions).
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 180_000;

/// Where ledger logs and tokens live.
#[derive(Debug, Clone)]
pub enum LedgerMode {
    /// The real network, through the consensus gateway and mirror node.
    Network(LedgerClientConfig),
    /// A process-local ledger. State is lost on restart.
    InMemory { operator_account_id: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    /// Empty allows any origin.
    pub cors_allow_origins: Vec<String>,
    pub request_timeout: Duration,
    pub ledger: LedgerMode,
    pub brokerage: BrokerageConfig,
    pub tokenization: TokenizationConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; blank values count as
    /// unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require =
            |key: &str| get(key).ok_or_else(|| anyhow!("{} must be set", key));
        let secs = |key: &str, default: u64| -> anyhow::Result<Duration> {
            match get(key) {
                Some(v) => Ok(Duration::from_secs(
                    v.trim()
                        .parse()
                        .with_context(|| format!("{} must be a number of seconds", key))?,
                )),
                None => Ok(Duration::from_secs(default)),
            }
        };

        let listen_addr = get("HV_LISTEN_ADDR")
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string())
            .parse()
            .context("HV_LISTEN_ADDR must be host:port")?;

        let request_timeout = match get("HV_REQUEST_TIMEOUT_MS") {
            Some(v) => Duration::from_millis(
                v.trim()
                    .parse()
                    .context("HV_REQUEST_TIMEOUT_MS must be a number of milliseconds")?,
            ),
            None => Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        };

        let cors_allow_origins = get("HV_CORS_ALLOW_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let operator_account_id = require("HV_OPERATOR_ACCOUNT_ID")?;
        let ledger = match get("HV_LEDGER_MODE").as_deref().map(str::trim) {
            None | Some("network") => LedgerMode::Network(
                LedgerClientConfig::new(
                    operator_account_id,
                    require("HV_OPERATOR_PRIVATE_KEY")?,
                    require("HV_LEDGER_GATEWAY_URL")?,
                )
                .with_mirror_node_url(
                    get("HV_MIRROR_NODE_URL")
                        .unwrap_or_else(|| DEFAULT_MIRROR_NODE_URL.to_string()),
                )
                .with_timeouts(
                    secs("HV_LEDGER_SUBMIT_TIMEOUT_SECS", DEFAULT_SUBMIT_TIMEOUT_SECS)?,
                    secs("HV_LEDGER_READ_TIMEOUT_SECS", DEFAULT_READ_TIMEOUT_SECS)?,
                ),
            ),
            Some("memory") => LedgerMode::InMemory {
                operator_account_id,
            },
            Some(other) => {
                return Err(anyhow!(
                    "HV_LEDGER_MODE must be 'network' or 'memory', got '{}'",
                    other
                ))
            }
        };

        let brokerage = BrokerageConfig::new(
            require("HV_BROKERAGE_KEY_ID")?,
            require("HV_BROKERAGE_SECRET")?,
        )
        .with_base_url(get("HV_BROKERAGE_URL").unwrap_or_else(|| DEFAULT_BROKERAGE_URL.to_string()))
        .with_timeout(secs("HV_BROKERAGE_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?);

        let mut tokenization = TokenizationConfig::default();
        if let Some(list) = get("HV_ELIGIBLE_ASSETS") {
            tokenization.eligible_assets = TokenizationConfig::parse_allow_list(&list)
                .context("HV_ELIGIBLE_ASSETS is malformed")?;
        }
        if let Some(logo) = get("HV_DEFAULT_LOGO_URL") {
            tokenization.default_logo_ref = logo;
        }

        Ok(Self {
            listen_addr,
            db_path: get("HV_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string()),
            cors_allow_origins,
            request_timeout,
            ledger,
            brokerage,
            tokenization,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 5] = [
        ("HV_OPERATOR_ACCOUNT_ID", "0.0.1"),
        ("HV_OPERATOR_PRIVATE_KEY", "00"),
        ("HV_LEDGER_GATEWAY_URL", "http://gateway"),
        ("HV_BROKERAGE_KEY_ID", "key"),
        ("HV_BROKERAGE_SECRET", "secret"),
    ];

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&REQUIRED)).unwrap();
        assert_eq!(config.listen_addr.port(), 8080);
        assert_eq!(config.db_path, DEFAULT_DB_PATH);
        assert_eq!(config.request_timeout, Duration::from_secs(180));
        assert!(config.cors_allow_origins.is_empty());
        assert_eq!(config.brokerage.base_url, DEFAULT_BROKERAGE_URL);
        assert_eq!(config.tokenization, TokenizationConfig::default());
        match config.ledger {
            LedgerMode::Network(ledger) => {
                assert_eq!(ledger.mirror_node_url, DEFAULT_MIRROR_NODE_URL);
                assert_eq!(ledger.submit_timeout, Duration::from_secs(60));
                assert_eq!(ledger.read_timeout, Duration::from_secs(15));
            }
            other => panic!("unexpected ledger mode: {other:?}"),
        }
    }

    #[test]
    fn test_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("HV_LISTEN_ADDR", "127.0.0.1:9000"),
            ("HV_CORS_ALLOW_ORIGINS", "http://a.test, http://b.test"),
            ("HV_ELIGIBLE_ASSETS", "AAPL=0.0.6509511:2,MSFT=0.0.7000001:0"),
            ("HV_DEFAULT_LOGO_URL", "https://logos.test/default.png"),
            ("HV_LEDGER_READ_TIMEOUT_SECS", "5"),
        ]);
        let config = Config::from_lookup(lookup(&pairs)).unwrap();

        assert_eq!(config.listen_addr.port(), 9000);
        assert_eq!(config.cors_allow_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.tokenization.eligible_assets.len(), 2);
        assert_eq!(config.tokenization.logo_for("TSLA"), "https://logos.test/default.png");
        match config.ledger {
            LedgerMode::Network(ledger) => {
                assert_eq!(ledger.read_timeout, Duration::from_secs(5))
            }
            other => panic!("unexpected ledger mode: {other:?}"),
        }
    }

    #[test]
    fn test_memory_mode_needs_no_gateway() {
        let config = Config::from_lookup(lookup(&[
            ("HV_LEDGER_MODE", "memory"),
            ("HV_OPERATOR_ACCOUNT_ID", "0.0.1"),
            ("HV_BROKERAGE_KEY_ID", "key"),
            ("HV_BROKERAGE_SECRET", "secret"),
        ]))
        .unwrap();
        assert!(matches!(config.ledger, LedgerMode::InMemory { .. }));
    }

    #[test]
    fn test_missing_and_malformed_values() {
        let err = Config::from_lookup(lookup(&REQUIRED[..2])).unwrap_err();
        assert!(err.to_string().contains("HV_LEDGER_GATEWAY_URL"));

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("HV_ELIGIBLE_ASSETS", "AAPL"));
        assert!(Config::from_lookup(lookup(&pairs)).is_err());

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("HV_LEDGER_MODE", "paper"));
        assert!(Config::from_lookup(lookup(&pairs)).is_err());
    }
}
