use async_trait::async_trait;
use log::{debug, info, warn};

use hashvault_core::errors::{Error, Result};
use hashvault_core::ledger::{
    LedgerError, LedgerLogTrait, LedgerMessage, LedgerReceipt, TokenAmount, TokenLedgerTrait,
};

use crate::config::LedgerClientConfig;
use crate::gateway::GatewayApi;
use crate::mirror::MirrorApi;
use crate::signer::OperatorSigner;

/// Ledger network adapter.
///
/// Writes go through the consensus gateway, signed with the operator key.
/// `fetch_latest` asks the gateway for the log's current sequence number and
/// then reads that message from the mirror node.
pub struct LedgerClient {
    gateway: GatewayApi,
    mirror: MirrorApi,
}

impl LedgerClient {
    pub fn new(config: LedgerClientConfig) -> Result<Self> {
        let signer =
            OperatorSigner::from_hex(&config.operator_account_id, &config.operator_private_key)?;
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Unexpected(format!("Failed to initialize HTTP client: {}", e)))?;

        let gateway = GatewayApi::new(
            client.clone(),
            &config.gateway_url,
            signer,
            config.submit_timeout,
            config.read_timeout,
        );
        let mirror = MirrorApi::new(client, &config.mirror_node_url, config.read_timeout);

        info!(
            "[LedgerClient] Operator {} via gateway {} (mirror {})",
            gateway.operator_account(),
            gateway.base_url(),
            mirror.base_url()
        );
        Ok(Self { gateway, mirror })
    }

    pub fn operator_account(&self) -> &str {
        self.gateway.operator_account()
    }

    pub fn gateway_url(&self) -> &str {
        self.gateway.base_url()
    }

    pub fn mirror_node_url(&self) -> &str {
        self.mirror.base_url()
    }
}

/// Token operations only count once the receipt reports success.
fn require_success(op: &str, receipt: LedgerReceipt) -> Result<LedgerReceipt> {
    if receipt.is_success() {
        Ok(receipt)
    } else {
        warn!(
            "[LedgerClient] {} {} finished with status {}",
            op, receipt.transaction_id, receipt.status
        );
        Err(LedgerError::RejectedByNetwork {
            status: receipt.status,
        }
        .into())
    }
}

#[async_trait]
impl LedgerLogTrait for LedgerClient {
    async fn append(&self, log_id: &str, memo: &str, payload: Vec<u8>) -> Result<u64> {
        let receipt: LedgerReceipt = self
            .gateway
            .submit_message(log_id, memo, &payload)
            .await?
            .into();

        if !receipt.is_success() {
            return Err(LedgerError::SubmissionFailed(receipt.status).into());
        }
        let sequence_number = receipt.sequence_number.ok_or_else(|| {
            LedgerError::InvalidResponse(format!(
                "receipt {} carries no sequence number",
                receipt.transaction_id
            ))
        })?;
        debug!(
            "[LedgerClient] Appended {} bytes to {} at #{} ({})",
            payload.len(),
            log_id,
            sequence_number,
            receipt.transaction_id
        );
        Ok(sequence_number)
    }

    async fn fetch_latest(&self, log_id: &str) -> Result<LedgerMessage> {
        let sequence_number = self.gateway.topic_sequence_number(log_id).await?;
        if sequence_number == 0 {
            return Err(LedgerError::NotFound(format!("log {} has no messages", log_id)).into());
        }
        let payload = self.mirror.message(log_id, sequence_number).await?;
        Ok(LedgerMessage {
            sequence_number,
            payload,
        })
    }
}

#[async_trait]
impl TokenLedgerTrait for LedgerClient {
    async fn mint_supply(&self, token_id: &str, amount: TokenAmount) -> Result<LedgerReceipt> {
        let units = amount.base_units()?;
        let receipt = self.gateway.mint(token_id, units).await?.into();
        let receipt = require_success("mint", receipt)?;
        info!(
            "[LedgerClient] Minted {} units of {} ({})",
            units, token_id, receipt.transaction_id
        );
        Ok(receipt)
    }

    async fn transfer(
        &self,
        token_id: &str,
        to_account: &str,
        amount: TokenAmount,
    ) -> Result<LedgerReceipt> {
        let units = amount.base_units()?;
        let receipt = self.gateway.transfer(token_id, to_account, units).await?.into();
        let receipt = require_success("transfer", receipt)?;
        info!(
            "[LedgerClient] Transferred {} units of {} to {} ({})",
            units, token_id, to_account, receipt.transaction_id
        );
        Ok(receipt)
    }
}
