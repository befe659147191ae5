use std::time::Duration;

/// Paper trading endpoint.
pub const DEFAULT_BROKERAGE_URL: &str = "https://paper-api.alpaca.markets";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Credentials and endpoint of the brokerage API.
#[derive(Debug, Clone)]
pub struct BrokerageConfig {
    pub base_url: String,
    pub key_id: String,
    pub secret: String,
    pub timeout: Duration,
}

impl BrokerageConfig {
    pub fn new(key_id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BROKERAGE_URL.to_string(),
            key_id: key_id.into(),
            secret: secret.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
