use std::time::Duration;

/// Public testnet mirror node.
pub const DEFAULT_MIRROR_NODE_URL: &str = "https://testnet.mirrornode.hedera.com";

/// Budget for submissions (append, mint, transfer), which wait for consensus.
pub const DEFAULT_SUBMIT_TIMEOUT_SECS: u64 = 60;

/// Budget for reads (sequence number lookups and mirror queries).
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 15;

/// Connection settings of the ledger adapter.
#[derive(Debug, Clone)]
pub struct LedgerClientConfig {
    /// Operator (issuer) account that pays for and signs submissions.
    pub operator_account_id: String,
    /// Hex-encoded ed25519 private key of the operator.
    pub operator_private_key: String,
    pub gateway_url: String,
    pub mirror_node_url: String,
    pub submit_timeout: Duration,
    pub read_timeout: Duration,
}

impl LedgerClientConfig {
    pub fn new(
        operator_account_id: impl Into<String>,
        operator_private_key: impl Into<String>,
        gateway_url: impl Into<String>,
    ) -> Self {
        Self {
            operator_account_id: operator_account_id.into(),
            operator_private_key: operator_private_key.into(),
            gateway_url: gateway_url.into(),
            mirror_node_url: DEFAULT_MIRROR_NODE_URL.to_string(),
            submit_timeout: Duration::from_secs(DEFAULT_SUBMIT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(DEFAULT_READ_TIMEOUT_SECS),
        }
    }

    pub fn with_mirror_node_url(mut self, url: impl Into<String>) -> Self {
        self.mirror_node_url = url.into();
        self
    }

    pub fn with_timeouts(mut self, submit: Duration, read: Duration) -> Self {
        self.submit_timeout = submit;
        self.read_timeout = read;
        self
    }
}
